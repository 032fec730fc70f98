//! Chat command implementation

use crate::cli::ChatArgs;
use crate::output::OutputWriter;
use crate::output_types::ChatOutput;
use anyhow::{bail, Result};
use dialoguer::Input;
use siteplan_core::config::LayeredConfig;
use siteplan_core::models::Transcript;
use siteplan_llm::{ChatCompleter, ChatSession, OpenAiChat, SendOutcome};

const QUIT_COMMANDS: [&str; 2] = ["/quit", "/exit"];

pub async fn execute(args: ChatArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let session = ChatSession::new(config.system_prompt.value.clone());
    let completer = OpenAiChat::from_config(config);
    let mut transcript = Transcript::with_greeting(config.greeting.value.clone());

    match args.message {
        Some(message) => one_shot(&session, &completer, &mut transcript, &message, output).await,
        None => {
            if output.is_json() {
                bail!("--json needs --message, the conversation is interactive");
            }
            conversation(&session, &completer, &mut transcript, output).await
        }
    }
}

async fn one_shot(
    session: &ChatSession,
    completer: &OpenAiChat,
    transcript: &mut Transcript,
    message: &str,
    output: &OutputWriter,
) -> Result<()> {
    let outcome = session.send(transcript, message, completer).await;

    if output.is_json() {
        return output.result(ChatOutput {
            model: completer.model_name().to_string(),
            outcome: outcome_label(&outcome),
            transcript: transcript.turns().to_vec(),
        });
    }

    for turn in transcript.turns() {
        output.turn(turn);
    }
    if outcome == SendOutcome::Ignored {
        output.warning("Empty message, nothing sent");
    }

    Ok(())
}

async fn conversation(
    session: &ChatSession,
    completer: &OpenAiChat,
    transcript: &mut Transcript,
    output: &OutputWriter,
) -> Result<()> {
    output.info(format!("Chatting with {}. Type /quit to leave.", completer.model_name()));
    for turn in transcript.turns() {
        output.turn(turn);
    }

    loop {
        let line: String = Input::new().with_prompt("you").allow_empty(true).interact_text()?;
        if QUIT_COMMANDS.contains(&line.trim()) {
            break;
        }

        let before = transcript.len();
        session.send(transcript, &line, completer).await;

        // The user turn was already echoed by the prompt
        for turn in transcript.turns().iter().skip(before + 1) {
            output.turn(turn);
        }
    }

    Ok(())
}

fn outcome_label(outcome: &SendOutcome) -> &'static str {
    match outcome {
        SendOutcome::Ignored => "ignored",
        SendOutcome::Replied => "replied",
        SendOutcome::Failed { .. } => "failed",
    }
}
