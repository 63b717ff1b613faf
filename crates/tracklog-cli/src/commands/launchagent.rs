//! Launch agent generator
//!
//! Writes a launchd property list that runs `tracklog update` at a fixed
//! interval, with stdout and stderr captured under the data directory.

use std::path::{Path, PathBuf};

use clap::Args;
use directories::BaseDirs;
use tracklog_engine::Config;

pub const DEFAULT_LABEL: &str = "tracklog";
pub const DEFAULT_INTERVAL_SECS: u32 = 3456;

#[derive(Debug, Args)]
pub struct LaunchAgentArgs {
    /// Seconds between runs
    #[arg(long, default_value_t = DEFAULT_INTERVAL_SECS)]
    pub interval: u32,

    /// launchd job label
    #[arg(long, default_value = DEFAULT_LABEL)]
    pub label: String,

    /// Output file (default: ~/Library/LaunchAgents/<label>.plist)
    #[arg(long)]
    pub output: Option<PathBuf>,
}

/// Everything the property list needs, with absolute paths
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchAgent {
    pub label: String,
    pub interval: u32,
    pub program: PathBuf,
    pub data_dir: PathBuf,
}

impl LaunchAgent {
    pub fn program_arguments(&self) -> Vec<String> {
        vec![
            self.program.display().to_string(),
            "--data-dir".to_string(),
            self.data_dir.display().to_string(),
            "update".to_string(),
        ]
    }

    pub fn render_plist(&self) -> String {
        let mut out = String::new();
        out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        out.push_str(
            "<!DOCTYPE plist PUBLIC \"-//Apple//DTD PLIST 1.0//EN\" \
             \"http://www.apple.com/DTDs/PropertyList-1.0.dtd\">\n",
        );
        out.push_str("<plist version=\"1.0\">\n<dict>\n");
        push_string(&mut out, "Label", &self.label);
        out.push_str("  <key>RunAtLoad</key>\n  <true/>\n");
        out.push_str(&format!(
            "  <key>StartInterval</key>\n  <integer>{}</integer>\n",
            self.interval
        ));
        out.push_str("  <key>ProgramArguments</key>\n  <array>\n");
        for arg in self.program_arguments() {
            out.push_str(&format!("    <string>{}</string>\n", xml_escape(&arg)));
        }
        out.push_str("  </array>\n");
        push_string(
            &mut out,
            "StandardOutPath",
            &self.data_dir.join("stdout").display().to_string(),
        );
        push_string(
            &mut out,
            "StandardErrorPath",
            &self.data_dir.join("stderr").display().to_string(),
        );
        out.push_str("</dict>\n</plist>\n");
        out
    }
}

fn push_string(out: &mut String, key: &str, value: &str) {
    out.push_str(&format!(
        "  <key>{}</key>\n  <string>{}</string>\n",
        key,
        xml_escape(value)
    ));
}

/// Escape the five XML special characters
pub fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn execute(args: LaunchAgentArgs, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let agent = LaunchAgent {
        label: args.label,
        interval: args.interval,
        program: std::env::current_exe()?,
        data_dir: absolute(&config.data_dir)?,
    };

    let output = match args.output {
        Some(path) => path,
        None => default_output(&agent.label)?,
    };
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let plist = agent.render_plist();
    std::fs::write(&output, &plist)?;

    println!("Created {}", output.display());
    print!("{}", plist);
    Ok(())
}

fn absolute(path: &Path) -> std::io::Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

fn default_output(label: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let dirs = BaseDirs::new().ok_or("Cannot locate a home directory; pass --output")?;
    Ok(agent_path(dirs.home_dir(), label))
}

fn agent_path(home: &Path, label: &str) -> PathBuf {
    home.join("Library")
        .join("LaunchAgents")
        .join(format!("{}.plist", label))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent() -> LaunchAgent {
        LaunchAgent {
            label: "tracklog".to_string(),
            interval: 600,
            program: PathBuf::from("/usr/local/bin/tracklog"),
            data_dir: PathBuf::from("/Users/me/Music & Stats"),
        }
    }

    #[test]
    fn test_plist_keys() {
        let plist = agent().render_plist();

        assert!(plist.contains("<key>Label</key>\n  <string>tracklog</string>"));
        assert!(plist.contains("<key>RunAtLoad</key>\n  <true/>"));
        assert!(plist.contains("<integer>600</integer>"));
        assert!(plist.contains("<string>/usr/local/bin/tracklog</string>"));
        assert!(plist.contains("<string>update</string>"));
        assert!(plist.ends_with("</plist>\n"));
    }

    #[test]
    fn test_paths_are_escaped() {
        let plist = agent().render_plist();

        assert!(plist.contains("<string>/Users/me/Music &amp; Stats/stdout</string>"));
        assert!(!plist.contains("Music & Stats"));
    }

    #[test]
    fn test_default_output_under_home() {
        assert_eq!(
            agent_path(Path::new("/Users/me"), "com.example.tracklog"),
            PathBuf::from("/Users/me/Library/LaunchAgents/com.example.tracklog.plist")
        );

        if let Some(dirs) = BaseDirs::new() {
            let path = default_output("tracklog").unwrap();
            assert!(path.starts_with(dirs.home_dir()));
            assert!(path.ends_with("Library/LaunchAgents/tracklog.plist"));
        }
    }

    #[test]
    fn test_xml_escape() {
        assert_eq!(xml_escape("a<b>&\"'"), "a&lt;b&gt;&amp;&quot;&apos;");
    }
}
