//! 选项文件解析模块
//!
//! 支持 TOML (主要) 和 JSON (可选) 格式。嵌套表按 `<section>.<field>` 展平,
//! 数组展平为空格分隔的文本。

use contracts::{ConfigError, OptionSet};

/// 选项文件格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// TOML 格式 (推荐)
    Toml,
    /// JSON 格式
    Json,
}

impl ConfigFormat {
    /// 从文件扩展名推断格式
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// 解析 TOML 格式选项
pub fn parse_toml(content: &str) -> Result<OptionSet, ConfigError> {
    let table: toml::Table = toml::from_str(content).map_err(|e| ConfigError::Parse {
        message: format!("TOML parse error: {e}"),
        source: Some(Box::new(e)),
    })?;
    let mut options = OptionSet::new();
    flatten_toml(None, &table, &mut options)?;
    Ok(options)
}

/// 解析 JSON 格式选项
pub fn parse_json(content: &str) -> Result<OptionSet, ConfigError> {
    let value: serde_json::Value =
        serde_json::from_str(content).map_err(|e| ConfigError::Parse {
            message: format!("JSON parse error: {e}"),
            source: Some(Box::new(e)),
        })?;
    let serde_json::Value::Object(map) = value else {
        return Err(ConfigError::parse("JSON options must be an object"));
    };
    let mut options = OptionSet::new();
    flatten_json(None, &map, &mut options)?;
    Ok(options)
}

/// 根据格式解析选项
pub fn parse(content: &str, format: ConfigFormat) -> Result<OptionSet, ConfigError> {
    match format {
        ConfigFormat::Toml => parse_toml(content),
        ConfigFormat::Json => parse_json(content),
    }
}

fn join_name(prefix: Option<&str>, key: &str) -> String {
    match prefix {
        Some(prefix) => format!("{prefix}.{key}"),
        None => key.to_string(),
    }
}

fn flatten_toml(
    prefix: Option<&str>,
    table: &toml::Table,
    out: &mut OptionSet,
) -> Result<(), ConfigError> {
    for (key, value) in table {
        let name = join_name(prefix, key);
        match value {
            toml::Value::Table(inner) => flatten_toml(Some(&name), inner, out)?,
            toml::Value::Array(items) => {
                let parts = items
                    .iter()
                    .map(|item| toml_scalar(&name, item))
                    .collect::<Result<Vec<_>, _>>()?;
                out.insert(name, parts.join(" "));
            }
            scalar => {
                let text = toml_scalar(&name, scalar)?;
                out.insert(name, text);
            }
        }
    }
    Ok(())
}

fn toml_scalar(name: &str, value: &toml::Value) -> Result<String, ConfigError> {
    match value {
        toml::Value::String(s) => Ok(s.clone()),
        toml::Value::Integer(i) => Ok(i.to_string()),
        toml::Value::Float(f) => Ok(f.to_string()),
        toml::Value::Boolean(b) => Ok(b.to_string()),
        toml::Value::Datetime(d) => Ok(d.to_string()),
        toml::Value::Array(_) | toml::Value::Table(_) => Err(ConfigError::malformed(
            name,
            value.to_string(),
            "nested arrays and tables are not option values",
        )),
    }
}

fn flatten_json(
    prefix: Option<&str>,
    map: &serde_json::Map<String, serde_json::Value>,
    out: &mut OptionSet,
) -> Result<(), ConfigError> {
    for (key, value) in map {
        let name = join_name(prefix, key);
        match value {
            serde_json::Value::Null => continue,
            serde_json::Value::Object(inner) => flatten_json(Some(&name), inner, out)?,
            serde_json::Value::Array(items) => {
                let parts = items
                    .iter()
                    .map(|item| json_scalar(&name, item))
                    .collect::<Result<Vec<_>, _>>()?;
                out.insert(name, parts.join(" "));
            }
            scalar => {
                let text = json_scalar(&name, scalar)?;
                out.insert(name, text);
            }
        }
    }
    Ok(())
}

fn json_scalar(name: &str, value: &serde_json::Value) -> Result<String, ConfigError> {
    match value {
        serde_json::Value::String(s) => Ok(s.clone()),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Bool(b) => Ok(b.to_string()),
        other => Err(ConfigError::malformed(
            name,
            other.to_string(),
            "nested arrays, objects and nulls are not option values",
        )),
    }
}
