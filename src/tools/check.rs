//! Runs BFE and PFlock on one dataset and diffs their flocks.
//!
//! Steps run one after another. The checker always runs, even when a finder
//! failed, and its exit code is the run's result.

use std::process::Command;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Args;
use tracing::{info, warn};

const PFLOCK_JAR: &str = "PFlock/target/scala-2.11/pflock_2.11-2.0.jar";
const PFLOCK_CLASS: &str = "FlockFinderMergeLast";
const CHECKER_JAR: &str = "Scripts/Scala/FlockChecker/target/scala-2.11/flockchecker_2.11-0.1.jar";

#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// Distance threshold
    #[arg(short, long, default_value_t = 10.0)]
    pub epsilon: f64,

    /// Minimum flock size
    #[arg(short, long, default_value_t = 3)]
    pub mu: u32,

    /// Minimum flock duration
    #[arg(short, long, default_value_t = 3)]
    pub delta: u32,

    /// Dataset directory, relative to the research home
    #[arg(short, long, default_value = "Datasets/Berlin/")]
    pub path: String,

    /// Dataset name, without extension
    #[arg(short = 'i', long, default_value = "berlin0-2")]
    pub dataset: String,

    /// Dataset file extension
    #[arg(long = "ext", default_value = "tsv")]
    pub extension: String,

    /// Skip the BFE run
    #[arg(long)]
    pub no_bfe: bool,

    /// Skip the PFlock run
    #[arg(long)]
    pub no_pflock: bool,

    /// Root of the research checkout, with a trailing slash
    #[arg(long, env = "RESEARCH_HOME")]
    pub research_home: String,
}

/// One external command.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    /// Tag of the timing log line, if the step is timed.
    pub tag: Option<&'static str>,
    pub program: String,
    pub args: Vec<String>,
}

impl Step {
    /// The command as a shell would print it.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Every command of a run, in order.
#[derive(Debug, Clone)]
pub struct CheckPlan {
    pub bfe: Option<Step>,
    pub pflock: Option<Step>,
    pub checker: Step,
}

impl CheckPlan {
    pub fn new(args: &CheckArgs) -> Self {
        let home = &args.research_home;
        let (e, m, d) = (args.epsilon.to_string(), args.mu.to_string(), args.delta.to_string());

        let bfe = (!args.no_bfe).then(|| Step {
            tag: Some("LOG_BFE"),
            program: "bfe".to_string(),
            args: vec![
                format!("{}{}{}.{}", home, args.path, args.dataset, args.extension),
                e.clone(),
                m.clone(),
                d.clone(),
            ],
        });

        let pflock = (!args.no_pflock).then(|| {
            let jar = format!("{home}{PFLOCK_JAR}");
            let argv = [
                "--class",
                PFLOCK_CLASS,
                jar.as_str(),
                "--epsilon",
                e.as_str(),
                "--epsilon_max",
                e.as_str(),
                "--mu",
                m.as_str(),
                "--mu_max",
                m.as_str(),
                "--delta",
                d.as_str(),
                "--delta_max",
                d.as_str(),
                "--path",
                args.path.as_str(),
                "--dataset",
                args.dataset.as_str(),
                "--speed",
                "100",
                "--debug",
            ];
            Step {
                tag: Some("LOG_PFLOCK"),
                program: "spark-submit".to_string(),
                args: argv.iter().map(|s| s.to_string()).collect(),
            }
        });

        let checker = Step {
            tag: None,
            program: "spark-submit".to_string(),
            args: vec![
                format!("{home}{CHECKER_JAR}"),
                format!("/tmp/PFLOCK_E{e}_M{m}_D{d}.txt"),
                format!("/tmp/BFE_E{e}_M{m}_D{d}.txt"),
            ],
        };

        Self {
            bfe,
            pflock,
            checker,
        }
    }
}

/// Run the plan; returns the checker's exit code.
pub fn run(args: &CheckArgs) -> Result<i32> {
    let plan = CheckPlan::new(args);
    let params = format!("{},{},{}", args.epsilon, args.mu, args.delta);

    for step in [&plan.bfe, &plan.pflock].into_iter().flatten() {
        info!("{}", step.command_line());
        let started = Instant::now();
        match Command::new(&step.program).args(&step.args).status() {
            Ok(status) if !status.success() => {
                warn!(program = %step.program, %status, "step failed, continuing")
            }
            Ok(_) => {}
            Err(e) => warn!(program = %step.program, error = %e, "cannot start step, continuing"),
        }
        if let Some(tag) = step.tag {
            info!("{},{},{}", tag, params, started.elapsed().as_secs_f64());
        }
    }

    info!("{}", plan.checker.command_line());
    let status = Command::new(&plan.checker.program)
        .args(&plan.checker.args)
        .status()
        .with_context(|| format!("Failed to start {}", plan.checker.program))?;

    Ok(status.code().unwrap_or(1))
}
