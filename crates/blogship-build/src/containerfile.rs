use blogship_core::{ImageSpec, Instruction};

/// Renders an [`ImageSpec`] as a Containerfile for a Docker-compatible engine.
///
/// Instructions keep the spec's order; metadata (`EXPOSE`, `LABEL`,
/// `ENTRYPOINT`, `CMD`) follows the last filesystem step.
pub struct ContainerfileGenerator<'a> {
    spec: &'a ImageSpec,
}

impl<'a> ContainerfileGenerator<'a> {
    pub fn new(spec: &'a ImageSpec) -> Self {
        Self { spec }
    }

    pub fn render(&self) -> String {
        let mut out = String::from("# syntax=docker/dockerfile:1\n");
        out.push_str(&format!("FROM {}\n", self.spec.base()));

        for instruction in self.spec.instructions() {
            let line = match instruction {
                Instruction::Packages(packages) => {
                    format!("RUN apk add --no-cache {}", packages.join(" "))
                }
                Instruction::Env { key, value } => format!("ENV {key}={}", quoted(value)),
                Instruction::File { source, dest } => format!("COPY {source} {dest}"),
                Instruction::Directory { source, dest, .. } => {
                    // Exclusions are applied while staging the context.
                    format!("COPY {source}/ {dest}/")
                }
                Instruction::Workdir(path) => format!("WORKDIR {path}"),
                Instruction::Exec(args) => format!("RUN {}", exec_form(args)),
            };
            out.push_str(&line);
            out.push('\n');
        }

        for port in self.spec.exposed_ports() {
            out.push_str(&format!("EXPOSE {port}\n"));
        }
        for (key, value) in self.spec.labels() {
            out.push_str(&format!("LABEL {}={}\n", quoted(key), quoted(value)));
        }
        if let Some(entrypoint) = self.spec.entrypoint() {
            out.push_str(&format!("ENTRYPOINT {}\n", exec_form(entrypoint)));
        }
        if let Some(args) = self.spec.default_args() {
            out.push_str(&format!("CMD {}\n", exec_form(args)));
        }

        out
    }
}

/// JSON array form, which the engine runs without a shell.
fn exec_form(args: &[String]) -> String {
    serde_json::Value::from(args.to_vec()).to_string()
}

fn quoted(value: &str) -> String {
    serde_json::Value::from(value).to_string()
}
