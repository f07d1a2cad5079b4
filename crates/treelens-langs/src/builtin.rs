use std::sync::{Arc, LazyLock};

use crate::{Lang, LangInner};

macro_rules! define_langs {
    (
        $(
            $fn_name:ident => {
                feature: $feature:literal,
                name: $name:literal,
                ts_lang: $ts_lang:expr,
                names: [$($alias:literal),* $(,)?],
                extensions: [$($ext:literal),* $(,)?] $(,)?
            }
        ),* $(,)?
    ) => {
        $(
            #[cfg(feature = $feature)]
            pub fn $fn_name() -> Lang {
                static LANG: LazyLock<Lang> =
                    LazyLock::new(|| Arc::new(LangInner::new($name, $ts_lang.into())));
                Arc::clone(&LANG)
            }
        )*

        pub fn from_name(s: &str) -> Option<Lang> {
            match s.to_ascii_lowercase().as_str() {
                $(
                    #[cfg(feature = $feature)]
                    $($alias)|* => Some($fn_name()),
                )*
                _ => None,
            }
        }

        pub fn from_ext(ext: &str) -> Option<Lang> {
            match ext.to_ascii_lowercase().as_str() {
                $(
                    #[cfg(feature = $feature)]
                    $($ext)|* => Some($fn_name()),
                )*
                _ => None,
            }
        }

        /// Every compiled-in language with its accepted aliases.
        pub fn all_with_aliases() -> Vec<(Lang, &'static [&'static str])> {
            vec![
                $(
                    #[cfg(feature = $feature)]
                    ($fn_name(), &[$($alias),*]),
                )*
            ]
        }

        pub fn all() -> Vec<Lang> {
            vec![
                $(
                    #[cfg(feature = $feature)]
                    $fn_name(),
                )*
            ]
        }
    };
}

define_langs! {
    bash => {
        feature: "lang-bash",
        name: "bash",
        ts_lang: arborium_bash::language(),
        names: ["bash", "sh", "shell"],
        extensions: ["sh", "bash", "zsh"],
    },
    c => {
        feature: "lang-c",
        name: "c",
        ts_lang: arborium_c::language(),
        names: ["c"],
        extensions: ["c", "h"],
    },
    cpp => {
        feature: "lang-cpp",
        name: "cpp",
        ts_lang: arborium_cpp::language(),
        names: ["cpp", "c++", "cxx", "cc"],
        extensions: ["cpp", "cc", "cxx", "hpp", "hh", "hxx", "h++", "c++"],
    },
    css => {
        feature: "lang-css",
        name: "css",
        ts_lang: arborium_css::language(),
        names: ["css"],
        extensions: ["css"],
    },
    go => {
        feature: "lang-go",
        name: "go",
        ts_lang: arborium_go::language(),
        names: ["go", "golang"],
        extensions: ["go"],
    },
    html => {
        feature: "lang-html",
        name: "html",
        ts_lang: arborium_html::language(),
        names: ["html", "htm"],
        extensions: ["html", "htm"],
    },
    java => {
        feature: "lang-java",
        name: "java",
        ts_lang: arborium_java::language(),
        names: ["java"],
        extensions: ["java"],
    },
    javascript => {
        feature: "lang-javascript",
        name: "javascript",
        ts_lang: arborium_javascript::language(),
        names: ["javascript", "js", "jsx", "ecmascript", "es"],
        extensions: ["js", "mjs", "cjs", "jsx"],
    },
    json => {
        feature: "lang-json",
        name: "json",
        ts_lang: arborium_json::language(),
        names: ["json"],
        extensions: ["json"],
    },
    lua => {
        feature: "lang-lua",
        name: "lua",
        ts_lang: arborium_lua::language(),
        names: ["lua"],
        extensions: ["lua"],
    },
    markdown => {
        feature: "lang-markdown",
        name: "markdown",
        ts_lang: arborium_markdown::language(),
        names: ["markdown", "md"],
        extensions: ["md", "markdown"],
    },
    python => {
        feature: "lang-python",
        name: "python",
        ts_lang: arborium_python::language(),
        names: ["python", "py"],
        extensions: ["py", "pyi", "pyw"],
    },
    query => {
        feature: "lang-query",
        name: "query",
        ts_lang: arborium_query::language(),
        names: ["query", "scm", "tsq"],
        extensions: ["scm"],
    },
    ruby => {
        feature: "lang-ruby",
        name: "ruby",
        ts_lang: arborium_ruby::language(),
        names: ["ruby", "rb"],
        extensions: ["rb", "rake", "gemspec"],
    },
    rust => {
        feature: "lang-rust",
        name: "rust",
        ts_lang: arborium_rust::language(),
        names: ["rust", "rs"],
        extensions: ["rs"],
    },
    toml => {
        feature: "lang-toml",
        name: "toml",
        ts_lang: arborium_toml::language(),
        names: ["toml"],
        extensions: ["toml"],
    },
    tsx => {
        feature: "lang-tsx",
        name: "tsx",
        ts_lang: arborium_tsx::language(),
        names: ["tsx"],
        extensions: ["tsx"],
    },
    typescript => {
        feature: "lang-typescript",
        name: "typescript",
        ts_lang: arborium_typescript::language(),
        names: ["typescript", "ts"],
        extensions: ["ts", "mts", "cts"],
    },
    yaml => {
        feature: "lang-yaml",
        name: "yaml",
        ts_lang: arborium_yaml::language(),
        names: ["yaml", "yml"],
        extensions: ["yaml", "yml"],
    },
}
