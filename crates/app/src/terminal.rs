use std::collections::HashSet;

use medassist_chat::{
    IgnoreReason, Message, MessageId, MessageStatus, Role, SessionController, SubmitOutcome,
};
use tokio::io::{AsyncBufReadExt, BufReader};

const QUIT_COMMANDS: [&str; 2] = ["/quit", "/exit"];

/// Turns transcript snapshots into plain lines, printing each entry once it is known.
///
/// A pending placeholder is announced once and printed again when it resolves.
#[derive(Debug, Default)]
pub struct TranscriptPrinter {
    announced: HashSet<MessageId>,
    printed: HashSet<MessageId>,
}

impl TranscriptPrinter {
    pub fn render(&mut self, messages: &[Message]) -> Vec<String> {
        let mut lines = Vec::new();
        for message in messages {
            if self.printed.contains(&message.id) {
                continue;
            }

            if message.status == MessageStatus::Pending {
                if self.announced.insert(message.id) {
                    lines.push(format!("{}> {}", speaker(message.role), message.body));
                }
                continue;
            }

            self.printed.insert(message.id);
            lines.push(format!("{}> {}", speaker(message.role), message.body));
            for item in &message.plan {
                lines.push(format!("  * {}", item.display_title()));
                if let Some(instructions) = &item.instructions {
                    lines.push(format!("      {instructions}"));
                }
                if let Some(rationale) = &item.rationale {
                    lines.push(format!("      why: {rationale}"));
                }
            }
            if let Some(disclaimer) = &message.disclaimer {
                lines.push(format!("  ({disclaimer})"));
            }
        }
        lines
    }
}

fn speaker(role: Role) -> &'static str {
    match role {
        Role::User => "you",
        Role::Assistant => "assistant",
    }
}

fn emit(lines: Vec<String>) {
    for line in lines {
        println!("{line}");
    }
}

/// Reads questions from stdin and prints the transcript as it changes, until EOF or `/quit`.
pub async fn run(controller: SessionController) -> std::io::Result<()> {
    let mut printer = TranscriptPrinter::default();
    let mut signals = controller.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    signals.borrow_and_update();
    emit(printer.render(&controller.snapshot()));

    loop {
        tokio::select! {
            changed = signals.changed() => {
                if changed.is_err() {
                    break;
                }
                signals.borrow_and_update();
                emit(printer.render(&controller.snapshot()));
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                if QUIT_COMMANDS.contains(&line.trim()) {
                    break;
                }
                if controller.submit(&line) == SubmitOutcome::Ignored(IgnoreReason::Busy) {
                    println!("(still waiting for the previous answer)");
                }
            }
        }
    }

    if controller.is_pending() {
        controller.settled().await;
        emit(printer.render(&controller.snapshot()));
    }

    tracing::info!(
        failed_exchanges = controller.failures().len(),
        "session closed"
    );
    Ok(())
}
