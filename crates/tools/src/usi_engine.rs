//! USI engine running as a child process, usable as the CPU's external engine.

use std::collections::HashSet;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use shogi_cpu_core::engine::{
    EngineError, EngineReply, ExternalEngine, SEARCH_TIMEOUT_MARGIN_MS, SearchOptions,
};
use shogi_cpu_core::notation::{BestMove, InfoSnapshot, parse_bestmove_line};

/// Budget for each of the `usiok` and `readyok` waits.
pub const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(30);
/// How long a dropped engine gets to honour `quit` before it is killed.
pub const SHUTDOWN_GRACE: Duration = Duration::from_millis(300);
const EXIT_POLL: Duration = Duration::from_millis(10);

/// How to launch the engine binary.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UsiEngineConfig {
    pub path: PathBuf,
    #[serde(default)]
    pub args: Vec<String>,
    /// Extra options as `Name=Value`, or a bare `Name` for buttons.
    #[serde(default)]
    pub usi_options: Vec<String>,
}

/// The running process with its pipes. Stdout is drained by a named reader
/// thread into `lines`; the channel disconnects when the engine closes it.
struct EngineChild {
    child: Child,
    stdin: BufWriter<ChildStdin>,
    lines: Receiver<String>,
}

impl EngineChild {
    fn launch(cfg: &UsiEngineConfig, label: &str) -> Result<Self> {
        let mut child = Command::new(&cfg.path)
            .args(&cfg.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .spawn()
            .with_context(|| format!("failed to spawn engine at {}", cfg.path.display()))?;
        let stdin = child.stdin.take().context("engine stdin was not captured")?;
        let stdout = child.stdout.take().context("engine stdout was not captured")?;

        let (tx, lines) = mpsc::channel();
        thread::Builder::new()
            .name(format!("{label}-stdout"))
            .spawn(move || {
                for line in BufReader::new(stdout).lines().map_while(|line| line.ok()) {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
            })
            .context("failed to start the engine reader thread")?;

        Ok(EngineChild { child, stdin: BufWriter::new(stdin), lines })
    }

    fn send(&mut self, line: &str) -> std::io::Result<()> {
        writeln!(self.stdin, "{line}")?;
        self.stdin.flush()
    }

    /// Polls for exit until `grace` runs out.
    fn wait_exit(&mut self, grace: Duration) -> Option<ExitStatus> {
        let deadline = Instant::now() + grace;
        loop {
            match self.child.try_wait() {
                Ok(Some(status)) => return Some(status),
                Ok(None) if Instant::now() < deadline => thread::sleep(EXIT_POLL),
                _ => return None,
            }
        }
    }
}

impl Drop for EngineChild {
    fn drop(&mut self) {
        // A broken pipe here means the engine is already gone.
        let _ = self.send("quit");
        match self.wait_exit(SHUTDOWN_GRACE) {
            Some(status) => log::debug!("engine exited with {status}"),
            None => {
                log::warn!("engine ignored quit, killing it");
                let _ = self.child.kill();
                let _ = self.child.wait();
            }
        }
    }
}

/// One USI engine process. Spawned by [`ExternalEngine::initialize`] and
/// shut down with `quit` when dropped.
pub struct UsiProcessEngine {
    config: UsiEngineConfig,
    label: String,
    process: Option<EngineChild>,
    advertised: HashSet<String>,
    engine_name: Option<String>,
    last_info: InfoSnapshot,
}

impl UsiProcessEngine {
    pub fn new(config: UsiEngineConfig) -> Self {
        let label = config
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "usi-engine".to_string());
        UsiProcessEngine {
            config,
            label,
            process: None,
            advertised: HashSet::new(),
            engine_name: None,
            last_info: InfoSnapshot::default(),
        }
    }

    /// Progress reported during the last search.
    pub fn last_info(&self) -> &InfoSnapshot {
        &self.last_info
    }

    fn process(&mut self) -> Result<&mut EngineChild> {
        let label = &self.label;
        self.process.as_mut().ok_or_else(|| anyhow!("{label}: engine not started"))
    }

    fn send(&mut self, line: &str) -> Result<()> {
        log::trace!("{} <- {line}", self.label);
        let sent = self.process()?.send(line);
        sent.with_context(|| format!("{}: failed to write `{line}`", self.label))
    }

    /// Next line from the engine, or `None` once `deadline` passes.
    fn next_line(&mut self, deadline: Instant) -> Result<Option<String>> {
        let remaining = deadline.saturating_duration_since(Instant::now());
        let received = self.process()?.lines.recv_timeout(remaining);
        match received {
            Ok(line) => {
                log::trace!("{} -> {line}", self.label);
                Ok(Some(line))
            }
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => bail!("{}: engine exited unexpectedly", self.label),
        }
    }

    fn expect_line(&mut self, deadline: Instant, waiting_for: &str) -> Result<String> {
        match self.next_line(deadline)? {
            Some(line) => Ok(line),
            None => bail!("{}: no {waiting_for} within {:?}", self.label, HANDSHAKE_TIMEOUT),
        }
    }

    /// `usi` .. `usiok`, configured options, `isready` .. `readyok`, then `usinewgame`.
    fn handshake(&mut self) -> Result<()> {
        self.process = None;
        self.advertised.clear();
        self.process = Some(EngineChild::launch(&self.config, &self.label)?);

        self.send("usi")?;
        let deadline = Instant::now() + HANDSHAKE_TIMEOUT;
        loop {
            let line = self.expect_line(deadline, "usiok")?;
            if line == "usiok" {
                break;
            }
            if let Some(name) = line.strip_prefix("id name ") {
                self.engine_name = Some(name.trim().to_string());
            } else if let Some(rest) = line.strip_prefix("option ")
                && let Some(name) = parse_option_name(rest)
            {
                self.advertised.insert(name);
            }
        }

        for option in self.config.usi_options.clone() {
            match setoption_command(&option, &self.advertised) {
                Some(cmd) => self.send(&cmd)?,
                None => log::warn!("{}: engine has no option for `{option}`, skipped", self.label),
            }
        }

        self.send("isready")?;
        let deadline = Instant::now() + HANDSHAKE_TIMEOUT;
        while self.expect_line(deadline, "readyok")? != "readyok" {}

        self.send("usinewgame")?;
        log::info!("{}: ready ({} options advertised)", self.label, self.advertised.len());
        Ok(())
    }

    /// Sends `stop` at the soft limit and gives up at the hard one.
    fn search(&mut self, sfen: &str, options: &SearchOptions) -> Result<Result<EngineReply, EngineError>> {
        self.send(&format!("position sfen {sfen}"))?;
        self.send(&go_command(options))?;

        let (soft, hard) = search_window(options);
        let start = Instant::now();
        let mut stop_sent = false;
        self.last_info = InfoSnapshot::default();

        loop {
            let deadline = start + if stop_sent { hard } else { soft };
            let Some(line) = self.next_line(deadline)? else {
                if stop_sent {
                    return Ok(Err(EngineError::Timeout(hard.as_millis() as u64)));
                }
                log::debug!("{}: soft limit reached, sending stop", self.label);
                self.send("stop")?;
                stop_sent = true;
                continue;
            };

            if line.starts_with("info") {
                self.last_info.update_from_line(&line);
                continue;
            }
            match parse_bestmove_line(&line) {
                Some(BestMove::Move(mv)) => {
                    return Ok(Ok(EngineReply {
                        mv,
                        score: self.last_info.score,
                        pv: self.last_info.pv.clone(),
                    }));
                }
                Some(BestMove::Resign | BestMove::Win) => return Ok(Err(EngineError::NoMove)),
                None => {}
            }
        }
    }
}

impl ExternalEngine for UsiProcessEngine {
    fn name(&self) -> &str {
        self.engine_name.as_deref().unwrap_or(&self.label)
    }

    fn initialize(&mut self) -> Result<(), EngineError> {
        self.handshake().map_err(|e| {
            self.process = None;
            EngineError::Crashed(format!("{e:#}"))
        })
    }

    fn is_ready(&self) -> bool {
        self.process.is_some()
    }

    fn best_move(&mut self, sfen: &str, options: &SearchOptions) -> Result<EngineReply, EngineError> {
        if self.process.is_none() {
            return Err(EngineError::NotReady);
        }
        self.search(sfen, options).unwrap_or_else(|e| {
            self.process = None;
            Err(EngineError::Crashed(format!("{e:#}")))
        })
    }

    fn stop(&mut self) {
        if self.process.is_some() {
            let _ = self.send("stop");
        }
    }
}

/// Soft and hard limits measured from `go`. Depth-only searches get the
/// margin as their soft limit.
pub fn search_window(options: &SearchOptions) -> (Duration, Duration) {
    let margin = Duration::from_millis(SEARCH_TIMEOUT_MARGIN_MS);
    let soft = match options.time_limit_ms {
        0 => margin,
        ms => Duration::from_millis(ms),
    };
    (soft, soft + margin)
}

pub fn go_command(options: &SearchOptions) -> String {
    let mut cmd = String::from("go");
    if options.time_limit_ms > 0 {
        cmd.push_str(&format!(" movetime {}", options.time_limit_ms));
    }
    if options.depth > 0 {
        cmd.push_str(&format!(" depth {}", options.depth));
    }
    cmd
}

/// Builds `setoption` for a configured `Name=Value` (or bare `Name`). Names
/// the engine did not advertise are dropped, unless it advertised none.
pub fn setoption_command(option: &str, advertised: &HashSet<String>) -> Option<String> {
    let (name, value) = match option.split_once('=') {
        Some((name, value)) => (name.trim(), Some(value.trim())),
        None => (option.trim(), None),
    };
    if name.is_empty() || (!advertised.is_empty() && !advertised.contains(name)) {
        return None;
    }
    Some(match value {
        Some(value) => format!("setoption name {name} value {value}"),
        None => format!("setoption name {name}"),
    })
}

pub fn parse_option_name(line: &str) -> Option<String> {
    let mut tokens = line.split_whitespace();
    tokens.by_ref().find(|&tok| tok == "name")?;
    let parts: Vec<&str> = tokens.take_while(|&tok| tok != "type").collect();
    (!parts.is_empty()).then(|| parts.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_option_name() {
        assert_eq!(parse_option_name("name USI_Hash type spin default 256"), Some("USI_Hash".into()));
        assert_eq!(parse_option_name("name Book File type string"), Some("Book File".into()));
        assert_eq!(parse_option_name("type spin"), None);
        assert_eq!(parse_option_name("name type check"), None);
    }

    #[test]
    fn test_go_command() {
        assert_eq!(go_command(&SearchOptions { time_limit_ms: 1000, depth: 4 }), "go movetime 1000 depth 4");
        assert_eq!(go_command(&SearchOptions { time_limit_ms: 0, depth: 6 }), "go depth 6");
    }

    #[test]
    fn test_search_window() {
        let timed = SearchOptions { time_limit_ms: 1000, depth: 0 };
        assert_eq!(search_window(&timed), (Duration::from_millis(1000), timed.timeout()));

        let margin = Duration::from_millis(SEARCH_TIMEOUT_MARGIN_MS);
        assert_eq!(search_window(&SearchOptions { time_limit_ms: 0, depth: 8 }), (margin, margin * 2));
    }

    #[test]
    fn test_setoption_command() {
        let advertised: HashSet<String> = ["USI_Hash".to_string(), "Clear Hash".to_string()].into();
        assert_eq!(
            setoption_command("USI_Hash = 64", &advertised).as_deref(),
            Some("setoption name USI_Hash value 64")
        );
        assert_eq!(setoption_command("Clear Hash", &advertised).as_deref(), Some("setoption name Clear Hash"));
        assert_eq!(setoption_command("Threads=4", &advertised), None);
        assert_eq!(
            setoption_command("Threads=4", &HashSet::new()).as_deref(),
            Some("setoption name Threads value 4")
        );
        assert_eq!(setoption_command(" =1", &HashSet::new()), None);
    }

    #[test]
    fn test_missing_binary_fails_to_initialize() {
        let mut engine = UsiProcessEngine::new(UsiEngineConfig {
            path: PathBuf::from("/nonexistent/usi-engine"),
            ..UsiEngineConfig::default()
        });
        assert_eq!(engine.name(), "usi-engine");
        match engine.initialize() {
            Err(EngineError::Crashed(msg)) => {
                assert!(msg.contains("failed to spawn engine at /nonexistent/usi-engine"), "{msg}");
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(!engine.is_ready());
        assert!(matches!(
            engine.best_move("startpos", &SearchOptions { time_limit_ms: 10, depth: 1 }),
            Err(EngineError::NotReady)
        ));
    }

    #[cfg(unix)]
    fn scripted_engine(script: &str) -> UsiProcessEngine {
        UsiProcessEngine::new(UsiEngineConfig {
            path: PathBuf::from("/bin/sh"),
            args: vec!["-c".to_string(), script.to_string()],
            usi_options: vec!["USI_Hash=32".to_string(), "Threads=2".to_string()],
        })
    }

    #[cfg(unix)]
    #[test]
    fn test_scripted_engine_session() {
        let script = r#"
            while read -r line; do
                case "$line" in
                    usi) echo "id name Scripted"; echo "option name USI_Hash type spin default 16"; echo usiok ;;
                    isready) echo readyok ;;
                    go*) echo "info depth 3 score cp 42 pv 7g7f 3c3d"; echo "bestmove 7g7f" ;;
                    quit) exit 0 ;;
                esac
            done
        "#;
        let mut engine = scripted_engine(script);
        engine.initialize().unwrap();
        assert!(engine.is_ready());
        assert_eq!(engine.name(), "Scripted");
        assert!(engine.advertised.contains("USI_Hash"));

        let sfen = "lnsgkgsnl/1r5b1/ppppppppp/9/9/9/PPPPPPPPP/1B5R1/LNSGKGSNL b - 1";
        let reply = engine.best_move(sfen, &SearchOptions { time_limit_ms: 1000, depth: 0 }).unwrap();
        assert_eq!(reply.mv, "7g7f");
        assert_eq!(reply.pv, vec!["7g7f".to_string(), "3c3d".to_string()]);
        assert_eq!(engine.last_info().depth, Some(3));
        drop(engine);
    }

    #[cfg(unix)]
    #[test]
    fn test_engine_dying_mid_search_is_crash() {
        let script = r#"
            while read -r line; do
                case "$line" in
                    usi) echo usiok ;;
                    isready) echo readyok ;;
                    go*) exit 3 ;;
                esac
            done
        "#;
        let mut engine = scripted_engine(script);
        engine.initialize().unwrap();
        let sfen = "lnsgkgsnl/1r5b1/ppppppppp/9/9/9/PPPPPPPPP/1B5R1/LNSGKGSNL b - 1";
        match engine.best_move(sfen, &SearchOptions { time_limit_ms: 1000, depth: 0 }) {
            Err(EngineError::Crashed(msg)) => assert!(msg.contains("exited unexpectedly"), "{msg}"),
            other => panic!("unexpected {other:?}"),
        }
        assert!(!engine.is_ready());
    }
}
