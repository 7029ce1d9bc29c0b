use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use handoff_assistant::{parse_patient_str, ConversationSession, SubmitOutcome};
use handoff_core::{AssistantConfig, PatientRecord};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "handoff-cli",
    about = "Chat with the clinical handoff assistant about one patient."
)]
struct Args {
    /// Path to the patient record JSON file.
    #[arg(short, long)]
    patient: PathBuf,

    /// Message to send; repeat for several. Reads stdin lines when omitted.
    #[arg(short, long)]
    message: Vec<String>,

    /// Print the whole transcript as JSON when the chat ends.
    #[arg(long)]
    json: bool,
}

/// Where nurse messages come from (typed lines, speech-to-text...).
trait TranscriptSource {
    fn next_message(&mut self) -> anyhow::Result<Option<String>>;
}

/// Where assistant replies go (terminal, speech synthesis...).
trait SpeechOutput {
    fn speak(&mut self, text: &str) -> anyhow::Result<()>;
}

struct ArgsSource(std::vec::IntoIter<String>);

impl TranscriptSource for ArgsSource {
    fn next_message(&mut self) -> anyhow::Result<Option<String>> {
        Ok(self.0.next())
    }
}

struct LineSource<R>(R);

impl<R: BufRead> TranscriptSource for LineSource<R> {
    fn next_message(&mut self) -> anyhow::Result<Option<String>> {
        let mut line = String::new();
        let read = self
            .0
            .read_line(&mut line)
            .context("could not read from stdin")?;
        Ok((read > 0).then(|| line.trim_end().to_string()))
    }
}

struct ConsoleOutput<W>(W);

impl<W: Write> SpeechOutput for ConsoleOutput<W> {
    fn speak(&mut self, text: &str) -> anyhow::Result<()> {
        writeln!(self.0, "{text}\n")?;
        Ok(())
    }
}

/// Replay the opening transcript, then answer messages until the source
/// runs dry or an end phrase closes the session.
fn run(
    session: &mut ConversationSession,
    patient: &PatientRecord,
    source: &mut dyn TranscriptSource,
    output: &mut dyn SpeechOutput,
) -> anyhow::Result<()> {
    for message in session.messages() {
        output.speak(&message.content)?;
    }

    while let Some(text) = source.next_message()? {
        match session.submit(patient, &text)? {
            SubmitOutcome::Ignored => {
                debug!("blank line skipped");
                continue;
            }
            SubmitOutcome::Replied(reply) => output.speak(&reply.content)?,
            SubmitOutcome::Closing(farewell) => {
                output.speak(&farewell.content)?;
                break;
            }
        }
    }

    session.close();
    info!(
        patient_id = %patient.id,
        messages = session.messages().len(),
        "chat ended"
    );
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let data = std::fs::read_to_string(&args.patient)
        .with_context(|| format!("could not read file {:?}", args.patient))?;
    let patient = parse_patient_str(&data)?;

    let mut session = ConversationSession::open(patient.clone(), AssistantConfig::default())?;
    let mut output = ConsoleOutput(io::stdout().lock());

    if args.message.is_empty() {
        let mut source = LineSource(io::stdin().lock());
        run(&mut session, &patient, &mut source, &mut output)?;
    } else {
        let mut source = ArgsSource(args.message.into_iter());
        run(&mut session, &patient, &mut source, &mut output)?;
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(session.messages())?);
    }

    Ok(())
}
