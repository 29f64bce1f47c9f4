use crate::config::{AdjacencyKind, HarnessConfig, SearchConfig};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandLineConfig {
    pub harness: HarnessConfig,
    pub json: bool,
}

impl CommandLineConfig {
    pub fn from_args(args: &[&str]) -> Result<Self, String> {
        let mut harness = HarnessConfig::default();
        let mut json = false;
        let mut iter = args.iter().skip(1);
        while let Some(arg) = iter.next() {
            match *arg {
                "--vertices" | "-n" => {
                    harness.spec.vertex_count = parse_value(arg, iter.next())?;
                }
                "--edges" | "-m" => {
                    harness.spec.edge_count = parse_value(arg, iter.next())?;
                }
                "--trials" => {
                    harness.trials = parse_value(arg, iter.next())?;
                }
                "--seed" => {
                    harness.seed = parse_value(arg, iter.next())?;
                }
                "--max-steps" => {
                    harness.search = SearchConfig {
                        max_steps: Some(parse_value(arg, iter.next())?),
                        ..harness.search
                    };
                }
                "--adjacency" => {
                    let value = iter
                        .next()
                        .ok_or_else(|| "--adjacency requires a value".to_string())?;
                    harness.adjacency = value
                        .parse::<AdjacencyKind>()
                        .map_err(|e| e.to_string())?;
                }
                "--json" => json = true,
                other => return Err(format!("unknown argument {other}")),
            }
        }
        harness.validate().map_err(|e| e.to_string())?;
        Ok(Self { harness, json })
    }

    pub fn help() -> &'static str {
        "Usage: graphiso [--vertices N] [--edges M] [--trials T] [--seed S] \
         [--max-steps K] [--adjacency sorted|hashed] [--json]\n"
    }
}

fn parse_value<T: std::str::FromStr>(flag: &str, value: Option<&&str>) -> Result<T, String> {
    let value = value.ok_or_else(|| format!("{flag} requires a value"))?;
    value
        .parse()
        .map_err(|_| format!("{flag}: cannot parse {value}"))
}
