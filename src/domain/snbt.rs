//! Stringified binary tag values, as accepted by `summon` and `data modify`.

use std::fmt;

use crate::domain::entities::Transform;

/// A tag value. Compounds keep insertion order so output is reproducible.
#[derive(Debug, Clone, PartialEq)]
pub enum Snbt {
    Int(i32),
    Float(f32),
    String(String),
    List(Vec<Snbt>),
    Compound(Vec<(String, Snbt)>),
}

impl Snbt {
    pub fn compound() -> Self {
        Snbt::Compound(Vec::new())
    }

    pub fn string(value: impl Into<String>) -> Self {
        Snbt::String(value.into())
    }

    /// Sets `key` on a compound, replacing an existing entry. No-op on other kinds.
    pub fn set(mut self, key: impl Into<String>, value: Snbt) -> Self {
        if let Snbt::Compound(entries) = &mut self {
            let key = key.into();
            match entries.iter_mut().find(|(k, _)| *k == key) {
                Some(entry) => entry.1 = value,
                None => entries.push((key, value)),
            }
        }
        self
    }
}

fn is_bare_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '+'))
}

fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    f.write_str("\"")?;
    for c in s.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            c => write!(f, "{}", c)?,
        }
    }
    f.write_str("\"")
}

impl fmt::Display for Snbt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Snbt::Int(v) => write!(f, "{}", v),
            Snbt::Float(v) => write!(f, "{}f", v),
            Snbt::String(s) => write_quoted(f, s),
            Snbt::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            Snbt::Compound(entries) => {
                f.write_str("{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    if is_bare_key(key) {
                        f.write_str(key)?;
                    } else {
                        write_quoted(f, key)?;
                    }
                    write!(f, ":{}", value)?;
                }
                f.write_str("}")
            }
        }
    }
}

/// Encodes a bone transform as the 16-element float list display entities expect.
pub fn matrix_to_snbt(matrix: &Transform) -> Snbt {
    Snbt::List(matrix.0.iter().map(|&v| Snbt::Float(v)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_identity_when_encoding_then_prints_sixteen_floats() {
        let encoded = matrix_to_snbt(&Transform::IDENTITY).to_string();
        assert_eq!(
            encoded,
            "[1f,0f,0f,0f,0f,1f,0f,0f,0f,0f,1f,0f,0f,0f,0f,1f]"
        );
    }

    #[test]
    fn given_fractional_values_when_encoding_then_keeps_shortest_form() {
        let mut m = Transform::IDENTITY;
        m.0[3] = 0.5;
        m.0[7] = -1.25;
        let encoded = matrix_to_snbt(&m).to_string();
        assert!(encoded.starts_with("[1f,0f,0f,0.5f,"));
        assert!(encoded.contains(",-1.25f,"));
    }

    #[test]
    fn given_compound_when_displaying_then_quotes_only_what_needs_it() {
        let tag = Snbt::compound()
            .set("id", Snbt::string("minecraft:item_display"))
            .set("with space", Snbt::Int(1))
            .set("Tags", Snbt::List(vec![Snbt::string("a\"b")]));
        assert_eq!(
            tag.to_string(),
            r#"{id:"minecraft:item_display","with space":1,Tags:["a\"b"]}"#
        );
    }

    #[test]
    fn given_existing_key_when_setting_then_replaces_in_place() {
        let tag = Snbt::compound()
            .set("a", Snbt::Int(1))
            .set("b", Snbt::Int(2))
            .set("a", Snbt::Int(3));
        assert_eq!(tag.to_string(), "{a:3,b:2}");
    }
}
