use std::process::{Command, ExitStatus, Stdio};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, bail};

use crate::host::{Host, HostSet};

/// Default command run for the selected host.
pub const DEFAULT_TEMPLATE: &str = "ssh {name}";

/// Pause between attempts in retry mode.
pub const RETRY_DELAY: Duration = Duration::from_secs(2);

/// A command line with `{placeholder}` fields filled from a host.
///
/// `{name}`, `{aliases}`, `{user}`, `{hostname}`, `{port}` and
/// `{proxycommand}` map to the host's fields. Any other key is looked up as a
/// directive of the host's config block. `{{` and `}}` are literal braces.
#[derive(Debug, Clone)]
pub struct CommandTemplate {
    template: String,
}

impl CommandTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// Render the template and split it into program and arguments.
    /// Fields may be empty; they simply vanish from the argument list.
    pub fn render(&self, hosts: &HostSet, host: &Host) -> Result<Vec<String>> {
        let mut out = String::new();
        let mut chars = self.template.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    out.push('{');
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    out.push('}');
                }
                '{' => {
                    let mut key = String::new();
                    loop {
                        match chars.next() {
                            Some('}') => break,
                            Some(k) => key.push(k),
                            None => bail!("unterminated placeholder in command template: {}", self.template),
                        }
                    }
                    out.push_str(field(hosts, host, key.trim()));
                }
                c => out.push(c),
            }
        }

        let argv: Vec<String> = out.split_whitespace().map(str::to_string).collect();
        if argv.is_empty() {
            bail!("command is empty");
        }
        Ok(argv)
    }
}

impl Default for CommandTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_TEMPLATE)
    }
}

fn field<'a>(hosts: &'a HostSet, host: &'a Host, key: &str) -> &'a str {
    match key.to_ascii_lowercase().as_str() {
        "name" => host.name.as_str(),
        "aliases" => host.aliases.as_str(),
        "user" => host.user.as_str(),
        "hostname" => host.hostname.as_str(),
        "port" => host.port.as_str(),
        "proxycommand" => host.proxy_command.as_str(),
        _ => hosts.directive(host, key),
    }
}

/// Run a command with inherited stdin/stdout/stderr and wait for it.
pub fn run(argv: &[String]) -> Result<ExitStatus> {
    let (program, args) = argv.split_first().context("command is empty")?;
    tracing::info!(command = %argv.join(" "), "running command");
    let status = Command::new(program)
        .args(args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .with_context(|| format!("Failed to launch {}", program))?;
    Ok(status)
}

/// Connect to the selected host.
///
/// With `retry`, a non-zero exit is retried after `RETRY_DELAY` until the
/// command succeeds. A command that cannot be launched is never retried.
pub fn connect(
    hosts: &HostSet,
    host: &Host,
    template: &CommandTemplate,
    retry: bool,
) -> Result<ExitStatus> {
    let argv = template.render(hosts, host)?;
    println!("Running command: {}", argv.join(" "));
    connect_with(&argv, retry, RETRY_DELAY, run)
}

/// The retry loop behind `connect`, with the runner and delay supplied.
pub fn connect_with(
    argv: &[String],
    retry: bool,
    delay: Duration,
    mut run: impl FnMut(&[String]) -> Result<ExitStatus>,
) -> Result<ExitStatus> {
    loop {
        let status = run(argv)?;
        if status.success() {
            if retry {
                println!("Connection closed.");
            }
            return Ok(status);
        }
        if !retry {
            tracing::warn!(command = %argv.join(" "), %status, "command exited with failure");
            return Ok(status);
        }
        println!(
            "Connection failed, retrying in {} seconds. Press Ctrl+C to cancel.",
            delay.as_secs()
        );
        thread::sleep(delay);
    }
}
