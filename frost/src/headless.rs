//! Headless mode for the frost widget.
//!
//! A line-oriented protocol over stdin/stdout for scripts and agents. The
//! widget runs on a virtual clock that only moves on `wait` and `run`.

use std::io::{self, BufRead, Write};
use std::time::Duration;

use frost_core::{
    HeadlessCommand, HeadlessReply, HeadlessWidget, OutcomeSource, ParticleSource, Transition,
    TriggerResult, WidgetView,
};
use tracing::warn;

const HELP: &[&str] = &[
    "  go           - Press the button",
    "  wait <ms>    - Advance the clock",
    "  run          - Advance until the widget is idle",
    "  status       - Show the widget state",
    "  help         - Show this help",
    "  quit         - Exit",
];

/// Drive `widget` from `input` until EOF or `quit`.
pub fn run_headless<O, P, R, W>(
    widget: &mut HeadlessWidget<O, P>,
    input: R,
    output: &mut W,
) -> io::Result<()>
where
    O: OutcomeSource,
    P: ParticleSource,
    R: BufRead,
    W: Write,
{
    writeln!(output, "=== Frost Headless Mode ===")?;
    writeln!(output, "{}", format_status(&widget.view(), widget.now()))?;
    writeln!(output)?;
    writeln!(output, "Commands:")?;
    for line in HELP {
        writeln!(output, "{line}")?;
    }
    writeln!(output)?;
    output.flush()?;

    for line in input.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let command = match line.parse::<HeadlessCommand>() {
            Ok(command) => command,
            Err(e) => {
                warn!(%line, "bad headless command");
                writeln!(output, "[ERROR] {e}. Type help for help.")?;
                output.flush()?;
                continue;
            }
        };

        let reply = widget.execute(command);
        write_reply(output, command, &reply, &widget.view(), widget.now())?;
        output.flush()?;

        if reply.quit {
            break;
        }
    }

    // EOF without quit still releases the timers.
    widget.execute(HeadlessCommand::Quit);
    Ok(())
}

fn write_reply<W: Write>(
    output: &mut W,
    command: HeadlessCommand,
    reply: &HeadlessReply,
    view: &WidgetView,
    now: Duration,
) -> io::Result<()> {
    if let Some(trigger) = reply.trigger {
        writeln!(output, "{}", format_trigger(trigger, now))?;
    }
    for transition in &reply.transitions {
        writeln!(output, "{}", format_transition(transition))?;
    }

    match command {
        HeadlessCommand::Status => writeln!(output, "{}", format_status(view, now))?,
        HeadlessCommand::Help => {
            writeln!(output, "[HELP]")?;
            for line in HELP {
                writeln!(output, "{line}")?;
            }
        }
        HeadlessCommand::Quit => writeln!(output, "Goodbye!")?,
        HeadlessCommand::Wait(_) | HeadlessCommand::RunUntilIdle => {
            writeln!(output, "[t={}ms] {}", now.as_millis(), view.display_text())?;
        }
        HeadlessCommand::Press => {}
    }
    Ok(())
}

fn format_trigger(trigger: TriggerResult, now: Duration) -> String {
    match trigger {
        TriggerResult::Started { settles_at } => format!(
            "[t={}ms] idle -> rolling (settles at t={}ms)",
            now.as_millis(),
            settles_at.as_millis()
        ),
        TriggerResult::Ignored(state) => format!("[IGNORED] widget is {state}"),
        TriggerResult::TornDown => "[IGNORED] widget was torn down".to_string(),
    }
}

/// `[t=<ms>ms] <from> -> <to>` plus outcome and run, when present.
pub fn format_transition(t: &Transition) -> String {
    let mut line = format!("[t={}ms] {} -> {}", t.at.as_millis(), t.from, t.to);
    let details: Vec<String> = t
        .outcome
        .map(|o| o.to_string())
        .into_iter()
        .chain(t.run.map(|r| r.to_string()))
        .collect();
    if !details.is_empty() {
        line.push_str(&format!(" ({})", details.join(", ")));
    }
    line
}

fn format_status(view: &WidgetView, now: Duration) -> String {
    let mut line = format!(
        "[STATUS] t={}ms state={} value={} label=\"{}\" enabled={}",
        now.as_millis(),
        view.state,
        view.display_text(),
        view.label,
        view.enabled
    );
    if let Some((run, samples)) = &view.particles {
        line.push_str(&format!(" run={run} particles={}", samples.len()));
    }
    if let Some(frost) = view.frost {
        line.push_str(&format!(" frost={:.2}", frost.opacity));
    }
    line
}
