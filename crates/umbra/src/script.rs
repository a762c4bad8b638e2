//! Blocking bootstrap script for server-rendered pages.
//!
//! The marker has to be on the document root before the first paint, or the
//! page flashes light before a deferred script switches it. This module
//! renders the small inline script that performs [`apply_on_load`] in the
//! browser, parameterized by the [`Config`]'s key, marker and codec, to be
//! placed in the document head.
//!
//! [`apply_on_load`]: crate::ThemeResolver::apply_on_load

use minijinja::{context, Environment};

use crate::config::Config;
use crate::error::UmbraError;
use crate::preference::Preference;

const BOOTSTRAP_TEMPLATE: &str = r#"(function () {
  var systemDark = false;
  try {
    systemDark = window.matchMedia("(prefers-color-scheme: dark)").matches;
  } catch (e) {}
  var theme = null;
  try {
    theme = window.localStorage.getItem({{ key }});
  } catch (e) {}
  if (theme === {{ dark }} || ((theme === null || theme === {{ system }}) && systemDark)) {
    document.documentElement.classList.add({{ marker }});
  }
})();"#;

// Named without an extension so minijinja does not auto-escape.
const TEMPLATE_NAME: &str = "bootstrap";

/// Renders the script body.
pub fn render_bootstrap_script(config: &Config) -> Result<String, UmbraError> {
    config.validate()?;

    let mut env = Environment::new();
    env.add_template(TEMPLATE_NAME, BOOTSTRAP_TEMPLATE)?;
    let template = env.get_template(TEMPLATE_NAME)?;

    let dark = config.codec.encode(Preference::Dark)?;
    let system = config.codec.encode(Preference::System)?;
    let rendered = template.render(context! {
        key => js_string(&config.storage_key),
        marker => js_string(&config.marker),
        dark => js_string(&dark),
        system => js_string(&system),
    })?;
    Ok(rendered)
}

/// Renders the script wrapped in a `<script>` element.
pub fn render_bootstrap_tag(config: &Config) -> Result<String, UmbraError> {
    Ok(format!("<script>\n{}\n</script>", render_bootstrap_script(config)?))
}

/// A JS string literal that is also safe inside an inline `<script>`.
fn js_string(value: &str) -> String {
    // A JSON string is a valid JS string literal.
    serde_json::Value::from(value)
        .to_string()
        .replace("</", "<\\/")
        .replace("<!--", "<\\!--")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preference::StorageCodec;

    #[test]
    fn default_script_checks_plain_values() {
        let script = render_bootstrap_script(&Config::default()).unwrap();
        assert!(script.contains(r#"localStorage.getItem("theme")"#));
        assert!(script.contains(r#"theme === "dark""#));
        assert!(script.contains(r#"theme === "system""#));
        assert!(script.contains(r#"classList.add("dark")"#));
        assert!(script.contains("(prefers-color-scheme: dark)"));
    }

    #[test]
    fn json_codec_compares_quoted_variants() {
        let config = Config {
            codec: StorageCodec::Json,
            ..Config::default()
        };
        let script = render_bootstrap_script(&config).unwrap();
        assert!(script.contains(r#"theme === "\"Dark\"""#));
        assert!(script.contains(r#"theme === "\"System\"""#));
    }

    #[test]
    fn values_cannot_close_the_script_element() {
        let config = Config {
            storage_key: "</script><script>alert(1)".into(),
            ..Config::default()
        };
        let script = render_bootstrap_script(&config).unwrap();
        assert!(!script.contains("</script>"));
        assert!(script.contains(r#"<\/script>"#));
    }

    #[test]
    fn tag_wraps_script() {
        let tag = render_bootstrap_tag(&Config::default()).unwrap();
        assert!(tag.starts_with("<script>\n(function () {"));
        assert!(tag.ends_with("})();\n</script>"));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = Config {
            marker: "two words".into(),
            ..Config::default()
        };
        assert!(matches!(
            render_bootstrap_script(&config),
            Err(UmbraError::InvalidConfig(_))
        ));
    }
}
