use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use quiz_extract::clients::DeepSeekClient;
use quiz_extract::config::Settings;
use quiz_extract::document::{extract_text, TextPages};
use quiz_extract::error::GenerationError;
use quiz_extract::history::{HistoryLog, HistoryRecord, JsonFileStore, QuizRecord};
use quiz_extract::interceptors::FileInterceptor;
use quiz_extract::scoring::format_clock;
use quiz_extract::{
    extract_outcome, Difficulty, ExtractionOutcome, Locale, ModelTier, PromptComposer, QuestionKind, Quiz,
    QuizConfiguration, QuizGenerator, QuizLanguage, QuizType, ResponseFormat,
};
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Parser)]
#[command(author, version, about = "Generate and extract bilingual quizzes", long_about = None)]
#[command(after_help = "ENVIRONMENT VARIABLES:
    DEEPSEEK_API_KEY     API key for the completion service
    DEEPSEEK_BASE_URL    API base URL [default: https://api.deepseek.com/v1]
    QUIZ_MODEL_TIER      fast | quality [default: fast]
    QUIZ_UI_LANGUAGE     en | ar [default: en]
    QUIZ_HISTORY_DIR     history directory [default: .quiz-history]
    QUIZ_TRANSCRIPT_DIR  write prompt/response transcripts here
    RUST_LOG             log filter [default: info]")]
struct Cli {
    /// UI language for labels and messages (overrides QUIZ_UI_LANGUAGE)
    #[arg(long, global = true)]
    ui: Option<Locale>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract a quiz from a model response (file or stdin)
    Extract {
        /// Response file; reads stdin when omitted or "-"
        input: Option<PathBuf>,
        #[command(flatten)]
        quiz: QuizArgs,
        /// Ignore the quiz options and infer labels from the text
        #[arg(long)]
        no_config: bool,
    },
    /// Print the prompt that would be sent for a configuration
    Prompt(QuizArgs),
    /// Generate a quiz through the completion service and save it to history
    Generate {
        #[command(flatten)]
        quiz: QuizArgs,
        /// fast | quality (overrides QUIZ_MODEL_TIER)
        #[arg(long)]
        tier: Option<ModelTier>,
        /// Do not record the quiz in history
        #[arg(long)]
        no_save: bool,
    },
    /// Inspect saved history
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },
}

#[derive(Subcommand)]
enum HistoryAction {
    /// List entries, newest first
    List {
        /// Only entries whose title contains this text
        #[arg(long)]
        search: Option<String>,
        /// Only quizzes
        #[arg(long)]
        quizzes: bool,
    },
    /// Print one entry as JSON
    Show { id: String },
    /// Delete one entry
    Delete { id: String },
}

#[derive(Args, Clone)]
struct QuizArgs {
    /// multiple-choice | text-answer | mixed
    #[arg(long = "type", default_value = "multiple-choice")]
    quiz_type: QuizType,
    /// easy | medium | hard | expert
    #[arg(long, default_value = "medium")]
    difficulty: Difficulty,
    #[arg(long, default_value_t = 10)]
    count: u32,
    /// Minutes; 0 means unlimited
    #[arg(long, default_value_t = 0)]
    time_limit: u32,
    #[arg(long)]
    subject: Option<String>,
    /// Extra requirements appended to the prompt
    #[arg(long)]
    instructions: Option<String>,
    /// english | arabic
    #[arg(long, default_value = "english")]
    language: QuizLanguage,
    /// Document to draw questions from; form feeds separate pages
    #[arg(long)]
    source: Option<PathBuf>,
    /// Ask for a fenced JSON block instead of lettered text
    #[arg(long)]
    structured: bool,
}

impl QuizArgs {
    async fn configuration(&self) -> Result<QuizConfiguration> {
        let mut config = QuizConfiguration::new(self.quiz_type, self.difficulty, self.count)
            .with_time_limit(self.time_limit)
            .with_language(self.language);
        if let Some(subject) = &self.subject {
            config = config.with_subject(subject.clone());
        }
        if let Some(instructions) = &self.instructions {
            config = config.with_custom_instructions(instructions.clone());
        }
        if let Some(path) = &self.source {
            let raw = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("reading {}", path.display()))?;
            let text = extract_text(&TextPages::from_form_feeds(&raw)).await?;
            config = config.with_source_text(text);
        }
        Ok(config)
    }

    fn composer(&self) -> PromptComposer {
        let format = if self.structured {
            ResponseFormat::Structured
        } else {
            ResponseFormat::Lettered
        };
        PromptComposer::new().with_format(format)
    }
}

fn read_input(input: Option<&PathBuf>) -> Result<String> {
    match input {
        Some(path) if path.as_os_str() != "-" => {
            std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
        }
        _ => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text).context("reading stdin")?;
            Ok(text)
        }
    }
}

fn print_quiz(quiz: &Quiz, locale: Locale) {
    println!("{}", quiz.title);
    println!("{}", quiz.description);
    println!(
        "{} | {} | {}",
        quiz.subject,
        locale.difficulty_label(quiz.difficulty),
        format_clock(u64::from(quiz.time_limit_minutes) * 60)
    );
    for (i, question) in quiz.questions.iter().enumerate() {
        println!();
        println!("{}. {}", i + 1, question.text);
        match question.kind {
            QuestionKind::MultipleChoice => {
                for (j, option) in question.options.iter().enumerate() {
                    let label = quiz_extract::letters::option_label(j, locale.is_rtl())
                        .map(String::from)
                        .unwrap_or_else(|| (j + 1).to_string());
                    let mark = if j == question.correct_index { "*" } else { " " };
                    println!("  {} {}) {}", mark, label, option);
                }
            }
            QuestionKind::TextAnswer => {
                println!("  = {}", question.correct_option().unwrap_or_default());
            }
        }
        if let Some(explanation) = &question.explanation {
            println!("  > {}", explanation);
        }
    }
}

async fn generate(settings: &Settings, locale: Locale, quiz: &QuizArgs, tier: ModelTier, save: bool) -> Result<()> {
    let client = match DeepSeekClient::from_settings(settings) {
        Ok(client) => client,
        Err(e) => bail!("{} ({})", locale.error_message(&e), e),
    };
    let config = quiz.configuration().await?;

    let mut generator = QuizGenerator::new(client)
        .with_locale(locale)
        .with_tier(tier)
        .with_composer(quiz.composer());
    if let Some(dir) = &settings.transcript_dir {
        generator = generator.with_interceptor(Arc::new(FileInterceptor::new(dir.clone())));
    }

    // Display-only elapsed counter; never cancels the request.
    let started = Instant::now();
    let ticker = tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(1));
        loop {
            interval.tick().await;
            eprint!("\r{} {}", tier, format_clock(started.elapsed().as_secs()));
        }
    });
    let result = generator.generate(&config).await;
    ticker.abort();
    eprintln!();

    let quiz = match result {
        Ok(quiz) => quiz,
        Err(GenerationError::Ai(e)) => bail!("{} ({})", locale.error_message(&e), e),
        Err(GenerationError::ParseFailure { raw_response }) => {
            eprintln!("{}", raw_response);
            bail!("{}", locale.parse_failure_message())
        }
    };

    println!(
        "{}\n",
        locale.quiz_ready_message(quiz.question_count(), &quiz.subject, quiz.difficulty)
    );
    print_quiz(&quiz, locale);

    if save {
        let log = HistoryLog::new(JsonFileStore::new(settings.history_dir.clone()));
        let record = QuizRecord::new(quiz);
        let id = record.id.clone();
        log.append(record).await?;
        println!("\nSaved as {}", id);
    }
    Ok(())
}

async fn history(settings: &Settings, action: HistoryAction) -> Result<()> {
    let log = HistoryLog::new(JsonFileStore::new(settings.history_dir.clone()));
    match action {
        HistoryAction::List { search, quizzes } => {
            let records = log.search(search.as_deref().unwrap_or(""), quizzes).await?;
            for record in records {
                let status = match &record {
                    HistoryRecord::Quiz(q) => match &q.results {
                        Some(r) => format!("quiz {}/{} {}", r.score, r.total_questions, r.grade()),
                        None => "quiz".to_string(),
                    },
                    HistoryRecord::Chat(c) => format!("chat ({} messages)", c.messages.len()),
                };
                println!(
                    "{}  {}  {}  {}",
                    record.id(),
                    record.timestamp().format("%Y-%m-%d %H:%M"),
                    status,
                    record.title()
                );
            }
        }
        HistoryAction::Show { id } => match log.get(&id).await? {
            Some(record) => println!("{}", serde_json::to_string_pretty(&record)?),
            None => bail!("no history entry {}", id),
        },
        HistoryAction::Delete { id } => {
            if !log.delete(&id).await? {
                bail!("no history entry {}", id);
            }
            println!("Deleted {}", id);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = Settings::from_env();
    let locale = cli.ui.unwrap_or(settings.locale);

    match cli.command {
        Command::Extract { input, quiz, no_config } => {
            let text = read_input(input.as_ref())?;
            let config = if no_config { None } else { Some(quiz.configuration().await?) };
            match extract_outcome(&text, config.as_ref(), locale) {
                ExtractionOutcome::Quiz { quiz, path } => {
                    tracing::info!(?path, "extracted");
                    println!("{}", serde_json::to_string_pretty(&quiz)?);
                }
                ExtractionOutcome::NotAQuiz => println!("{}", text),
                ExtractionOutcome::Unparsed => bail!("{}", locale.parse_failure_message()),
            }
        }
        Command::Prompt(quiz) => {
            let config = quiz.configuration().await?;
            println!("{}", quiz.composer().compose(&config));
        }
        Command::Generate { quiz, tier, no_save } => {
            let tier = tier.unwrap_or(settings.model_tier);
            generate(&settings, locale, &quiz, tier, !no_save).await?;
        }
        Command::History { action } => history(&settings, action).await?,
    }
    Ok(())
}
