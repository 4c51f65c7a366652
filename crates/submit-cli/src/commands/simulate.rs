use std::time::Duration;

use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;
use tracing::{info, warn};

use submit_core::sim::{Stage, StageSnapshot, TraceEvent, TraceKind};
use submit_core::{AppConfig, Operation};

/// Upper bound on how long a scenario may run after its last scripted step
const SETTLE_LIMIT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Scenario {
    /// Load, then succeed once the spinner shows
    Success,
    /// Load, then cancel once the spinner shows
    Cancel,
    /// Loading and success started together
    FullCycle,
    /// Load, then hard reset while the spinner turns
    Reset,
}

impl Scenario {
    /// Operations to call and the virtual time to call them at
    pub fn script(self) -> Vec<(Duration, Operation)> {
        let ms = Duration::from_millis;
        match self {
            Scenario::Success => vec![
                (ms(0), Operation::BeginLoading),
                (ms(200), Operation::BeginSuccess),
            ],
            Scenario::Cancel => vec![
                (ms(0), Operation::BeginLoading),
                (ms(200), Operation::CancelLoading),
            ],
            Scenario::FullCycle => vec![(ms(0), Operation::RunFullCycle)],
            Scenario::Reset => vec![
                (ms(0), Operation::BeginLoading),
                (ms(150), Operation::ResetToOriginal),
            ],
        }
    }
}

/// One line of simulator output
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Record {
    Snapshot(StageSnapshot),
    Trace(TraceEvent),
}

fn apply(stage: &mut Stage, operation: Operation) {
    let result = match operation {
        Operation::BeginLoading => stage.begin_loading(None),
        Operation::CancelLoading => stage.cancel_loading(None),
        Operation::BeginSuccess => stage.begin_success(None),
        Operation::RunFullCycle => stage.run_full_cycle(None),
        Operation::ResetToOriginal => {
            stage.reset_to_original();
            Ok(())
        }
    };
    if let Err(e) = result {
        warn!("Scripted step rejected: {}", e);
    }
}

/// Play a scenario, handing every trace event and a snapshot per step to `emit`.
/// Returns whether the stage settled.
pub async fn play<F>(
    stage: &mut Stage,
    scenario: Scenario,
    step: Duration,
    realtime: bool,
    mut emit: F,
) -> Result<bool>
where
    F: FnMut(Record) -> Result<()>,
{
    let step = step.max(Duration::from_millis(1));
    flush(stage, &mut emit)?;
    for (at, operation) in scenario.script() {
        while stage.now() < at {
            let dt = step.min(at - stage.now());
            if realtime {
                tokio::time::sleep(dt).await;
            }
            stage.advance(dt);
            flush(stage, &mut emit)?;
        }
        apply(stage, operation);
        flush(stage, &mut emit)?;
    }

    let deadline = stage.now() + SETTLE_LIMIT;
    while !stage.is_settled() {
        if stage.now() >= deadline {
            return Ok(false);
        }
        if realtime {
            tokio::time::sleep(step).await;
        }
        stage.advance(step);
        flush(stage, &mut emit)?;
    }
    Ok(true)
}

fn flush<F>(stage: &mut Stage, emit: &mut F) -> Result<()>
where
    F: FnMut(Record) -> Result<()>,
{
    for event in stage.take_trace() {
        emit(Record::Trace(event))?;
    }
    emit(Record::Snapshot(stage.snapshot()))
}

fn describe(kind: &TraceKind) -> String {
    match kind {
        TraceKind::Operation {
            operation,
            accepted: true,
        } => format!("call {}", operation),
        TraceKind::Operation {
            operation,
            accepted: false,
        } => format!("call {} (rejected)", operation),
        TraceKind::Dispatched { event } => format!("deliver {:?}", event),
        TraceKind::PhaseChanged { from, to } => format!("phase {} -> {}", from, to),
        TraceKind::Callback { operation } => format!("callback of {}", operation),
    }
}

fn print_text(record: &Record) {
    match record {
        Record::Trace(event) => println!("{:>8.1}ms  > {}", event.at_ms, describe(&event.kind)),
        Record::Snapshot(s) => println!(
            "{:>8.1}ms  {:<9}  w {:>6.1}  r {:>5.1}  x{:>5.2}  title {:<10?}  spinner {}",
            s.at_ms,
            s.phase,
            s.width,
            s.corner_radius,
            s.scale,
            s.title,
            if s.spinner.running { "on" } else { "off" },
        ),
    }
}

pub async fn run(
    config: &AppConfig,
    scenario: Scenario,
    step_ms: u64,
    json: bool,
    realtime: bool,
) -> Result<()> {
    let mut stage = Stage::from_config(config);
    info!("Simulating {:?} in {}ms steps", scenario, step_ms);

    let settled = play(
        &mut stage,
        scenario,
        Duration::from_millis(step_ms),
        realtime,
        |record| {
            if json {
                println!("{}", serde_json::to_string(&record)?);
            } else {
                print_text(&record);
            }
            Ok(())
        },
    )
    .await?;

    if !settled {
        warn!("Scenario did not settle within {:?}", SETTLE_LIMIT);
    }
    Ok(())
}
