//! Built-in template registry.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Template {
    pub name: &'static str,
    pub url: &'static str,
}

const TEMPLATES: &[Template] = &[
    Template {
        name: "web-vue",
        url: "git@github.com:themusecatcher/web-vue.git",
    },
    Template {
        name: "taro-vue",
        url: "git@github.com:themusecatcher/taro-vue.git",
    },
    Template {
        name: "naive-ui-admin",
        url: "git@github.com:jekip/naive-ui-admin.git",
    },
    Template {
        name: "vue-vben-admin",
        url: "git@github.com:vbenjs/vue-vben-admin.git",
    },
];

pub fn all() -> &'static [Template] {
    TEMPLATES
}

/// Look a template up by its display name.
pub fn find(name: &str) -> Option<&'static Template> {
    TEMPLATES.iter().find(|t| t.name == name)
}

pub fn names() -> Vec<String> {
    TEMPLATES.iter().map(|t| t.name.to_string()).collect()
}
