//! Command-line parsing.

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};

pub const USAGE: &str = "\
Usage: usdattr [--config <file>] <command>

Commands:
  tree <file>                                   Print the prim hierarchy
  find <file> <prim-name>                       Print the path of the first prim with that name
  get <file> <prim-name> <attr-name> [type] [time]
                                                Read an attribute through its node
                                                (type: float, double, int, vec3; default double)
  nodes                                         Print the node palette as JSON";

/// Output type of the `get` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Float,
    Double,
    Int,
    Vec3,
}

impl ValueKind {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "float" => Some(ValueKind::Float),
            "double" => Some(ValueKind::Double),
            "int" => Some(ValueKind::Int),
            "vec3" => Some(ValueKind::Vec3),
            _ => None,
        }
    }

    /// Name of the node reading this kind.
    pub fn node_name(&self, animated: bool) -> String {
        let kind = match self {
            ValueKind::Float => "Float",
            ValueKind::Double => "Double",
            ValueKind::Int => "Int",
            ValueKind::Vec3 => "Vec3",
        };
        let animated = if animated { "Animated" } else { "" };
        format!("GetUsd{}{}Attribute", animated, kind)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Tree {
        file: PathBuf,
    },
    Find {
        file: PathBuf,
        prim: String,
    },
    Get {
        file: PathBuf,
        prim: String,
        attr: String,
        kind: ValueKind,
        time: Option<f64>,
    },
    Nodes,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cli {
    pub config: Option<PathBuf>,
    pub command: Command,
}

/// Parse arguments, excluding the program name.
pub fn parse_args(args: &[String]) -> Result<Cli> {
    let mut config = None;
    let mut rest = Vec::new();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "--config" {
            let path = iter.next().ok_or_else(|| anyhow!("--config needs a file"))?;
            config = Some(PathBuf::from(path));
        } else {
            rest.push(arg.as_str());
        }
    }

    let command = match rest.as_slice() {
        ["tree", file] => Command::Tree { file: file.into() },
        ["find", file, prim] => Command::Find {
            file: file.into(),
            prim: prim.to_string(),
        },
        ["get", file, prim, attr, extra @ ..] if extra.len() <= 2 => {
            let kind = match extra.first() {
                Some(k) => {
                    ValueKind::parse(k).ok_or_else(|| anyhow!("Unknown value type '{}'", k))?
                }
                None => ValueKind::Double,
            };
            let time = extra
                .get(1)
                .map(|t| t.parse::<f64>().with_context(|| format!("Invalid time '{}'", t)))
                .transpose()?;
            Command::Get {
                file: file.into(),
                prim: prim.to_string(),
                attr: attr.to_string(),
                kind,
                time,
            }
        }
        ["nodes"] => Command::Nodes,
        _ => bail!("{}", USAGE),
    };

    Ok(Cli { config, command })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli> {
        let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        parse_args(&args)
    }

    #[test]
    fn test_get_defaults_to_double() {
        let cli = parse(&["get", "shot.usda", "Ball", "radius"]).unwrap();
        assert_eq!(
            cli.command,
            Command::Get {
                file: "shot.usda".into(),
                prim: "Ball".to_string(),
                attr: "radius".to_string(),
                kind: ValueKind::Double,
                time: None,
            }
        );
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_get_animated_with_config() {
        let cli = parse(&[
            "--config",
            "usdattr.toml",
            "get",
            "shot.usda",
            "Ball",
            "height",
            "vec3",
            "12.5",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("usdattr.toml")));
        assert!(matches!(
            cli.command,
            Command::Get {
                kind: ValueKind::Vec3,
                time: Some(t),
                ..
            } if t == 12.5
        ));
    }

    #[test]
    fn test_node_names() {
        assert_eq!(ValueKind::Vec3.node_name(false), "GetUsdVec3Attribute");
        assert_eq!(ValueKind::Int.node_name(true), "GetUsdAnimatedIntAttribute");
    }

    #[test]
    fn test_bad_arguments() {
        assert!(parse(&[]).is_err());
        assert!(parse(&["tree"]).is_err());
        assert!(parse(&["get", "a.usda", "Ball", "radius", "bool"]).is_err());
        assert!(parse(&["get", "a.usda", "Ball", "radius", "int", "soon"]).is_err());
        assert!(parse(&["nodes", "--config"]).is_err());
        assert_eq!(parse(&["nodes"]).unwrap().command, Command::Nodes);
    }
}
