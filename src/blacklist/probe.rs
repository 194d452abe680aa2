//! Empirical feature detection: run a tiny snippet per rule in the target
//! runtime; if it executes cleanly the feature is native and the rule can be
//! skipped.

use std::io;
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// Executes a candidate snippet in the target runtime.
pub trait ProbeRunner {
    /// Run `source`; `Ok(true)` when it executed cleanly.
    fn probe(&self, source: &str) -> io::Result<bool>;
}

/// Probe runner backed by the real runtime binary.
#[derive(Debug, Clone)]
pub struct RuntimeProbe {
    program: PathBuf,
}

impl RuntimeProbe {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl ProbeRunner for RuntimeProbe {
    fn probe(&self, source: &str) -> io::Result<bool> {
        let status = Command::new(&self.program)
            .arg("-e")
            .arg(source)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()?;
        Ok(status.success())
    }
}

struct Probe {
    rule: &'static str,
    source: &'static str,
}

// Feature snippets paired with the transformation rule they make redundant.
// A snippet must throw (usually a SyntaxError) on runtimes lacking the
// feature and run to completion everywhere else.
const PROBES: &[Probe] = &[
    Probe {
        rule: "es6.arrowFunctions",
        source: "var id = (x) => x; id(0);",
    },
    Probe {
        rule: "es6.blockScoping",
        source: "let a = 1; { let a = 2; }",
    },
    Probe {
        rule: "es6.classes",
        source: "class Probe {}",
    },
    Probe {
        rule: "es6.constants",
        source: "const a = 1;",
    },
    Probe {
        rule: "es6.destructuring",
        source: "var pair = [1, 2]; var [a, b] = pair;",
    },
    Probe {
        rule: "es6.forOf",
        source: "for (var v of [1, 2]) {}",
    },
    Probe {
        rule: "es6.literals",
        source: "var n = 0b10 + 0o17;",
    },
    Probe {
        rule: "es6.parameters",
        source: "(function (a = 1) { return a; })();",
    },
    Probe {
        rule: "es6.properties.computed",
        source: "var k = 'a'; var o = { [k]: 1 };",
    },
    Probe {
        rule: "es6.properties.shorthand",
        source: "var a = 1; var o = { a };",
    },
    Probe {
        rule: "es6.regex.sticky",
        source: "new RegExp('a', 'y');",
    },
    Probe {
        rule: "es6.regex.unicode",
        source: "new RegExp('a', 'u');",
    },
    Probe {
        rule: "es6.spread",
        source: "Math.max(...[1, 2]);",
    },
    Probe {
        rule: "es6.templateLiterals",
        source: "var who = 'x'; `hi ${who}`;",
    },
];

/// Build a blacklist by running every probe: a snippet the runtime executes
/// natively means its rule can be skipped.
pub fn detect_blacklist(runner: &dyn ProbeRunner) -> io::Result<Vec<String>> {
    let mut blacklist = Vec::new();
    for probe in PROBES {
        if runner.probe(probe.source)? {
            blacklist.push(probe.rule.to_string());
        }
    }
    Ok(blacklist)
}
