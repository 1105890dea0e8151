//! CLI interface for course-portal

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use crossterm::style::{Color, Stylize};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use crate::admin::{LessonEdit, NewQuestion, NewUser, ThemeEdit};
use crate::app::{App, Landing, Session};
use crate::config::{self, Backend, Config};
use crate::error::LmsError;
use crate::models::VisualConfig;
use crate::quiz::QuizAttempt;
use crate::storage::{Storage, StorageKeys};

#[derive(Parser)]
#[command(name = "course-portal")]
#[command(about = "Course portal with gated modules, quizzes and per-user progress", long_about = None)]
#[command(version)]
struct Cli {
    /// Use this configuration file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Keep everything in memory for this run
    #[arg(long, global = true)]
    ephemeral: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Credentials {
    /// Login name
    #[arg(short, long, env = "COURSE_PORTAL_USERNAME")]
    username: String,
    /// Password
    #[arg(short, long, env = "COURSE_PORTAL_PASSWORD", hide_env_values = true)]
    password: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Check credentials and show where the session starts
    Login {
        #[command(flatten)]
        auth: Credentials,
    },
    /// Show modules, lessons and what is unlocked
    Outline {
        #[command(flatten)]
        auth: Credentials,
    },
    /// Read a lesson
    Lesson {
        #[command(flatten)]
        auth: Credentials,
        /// Lesson ID
        id: String,
    },
    /// Mark a lesson as completed
    Complete {
        #[command(flatten)]
        auth: Credentials,
        /// Lesson ID
        id: String,
    },
    /// Show a module's quiz, or submit answers to it
    Quiz {
        #[command(flatten)]
        auth: Credentials,
        /// Module ID
        module: String,
        /// Answer as QUESTION=OPTION, e.g. 1=B (repeatable, later answers win)
        #[arg(short, long = "answer")]
        answers: Vec<String>,
    },
    /// Show overall progress
    Progress {
        #[command(flatten)]
        auth: Credentials,
    },
    /// Administration (admin accounts only)
    Admin {
        #[command(flatten)]
        auth: Credentials,
        #[command(subcommand)]
        command: AdminCommands,
    },
    /// Manage configuration and stored data
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum AdminCommands {
    /// List users
    Users,
    /// Add a student account
    AddUser {
        /// Display name
        #[arg(long)]
        name: String,
        /// Login name
        #[arg(long)]
        login: String,
        /// Password
        #[arg(long)]
        secret: String,
    },
    /// Delete a user
    DeleteUser {
        /// User ID
        id: String,
    },
    /// Append a module
    AddModule {
        /// Module title
        title: String,
    },
    /// Delete a module with its lessons and quiz
    DeleteModule {
        /// Module ID
        id: String,
    },
    /// Append a lesson to a module
    AddLesson {
        /// Module ID
        module: String,
        /// Lesson title
        title: String,
    },
    /// Edit a lesson
    EditLesson {
        /// Module ID
        module: String,
        /// Lesson ID
        lesson: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
        /// Video URL (empty to clear)
        #[arg(long)]
        video_url: Option<String>,
        /// Image URL (empty to clear)
        #[arg(long)]
        image_url: Option<String>,
    },
    /// Add a question to a module's quiz
    AddQuestion {
        /// Module ID
        module: String,
        /// Question text
        #[arg(long)]
        text: String,
        /// Answer option (repeat for each option, in order)
        #[arg(long = "option")]
        options: Vec<String>,
        /// Correct option as a letter or 1-based number
        #[arg(long)]
        correct: String,
    },
    /// Set a quiz's passing score (percent)
    SetPassingScore {
        /// Module ID
        module: String,
        score: u32,
    },
    /// Show or change the visual theme
    Theme {
        #[arg(long)]
        logo_url: Option<String>,
        /// Primary colour, #rrggbb
        #[arg(long)]
        primary_color: Option<String>,
        /// Background colour, #rrggbb
        #[arg(long)]
        background_color: Option<String>,
    },
    /// Progress of every student
    Report,
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Print the configuration file path
    Path,
    /// Reset configuration to defaults
    Reset,
    /// Delete stored records so seed data is used again
    ResetData {
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let config_file = match &cli.config {
        Some(path) => path.clone(),
        None => config::config_path()?,
    };
    let mut config = Config::load_from(&config_file)?;
    if cli.ephemeral {
        config.storage.backend = Backend::Memory;
    }

    match cli.command {
        Commands::Config { command } => run_config(command, &config, &config_file),
        Commands::Login { auth } => {
            let app = App::open(&config)?;
            let session = login(&app, &auth)?;
            let ui = Ui::new(app.theme());
            println!("{}", ui.heading(&app.course().title));
            println!("Signed in as {} ({})", session.user().display_name, session.role());
            match session.landing() {
                Landing::AdminContent => println!("Start here: course-portal admin --help"),
                Landing::Lesson(id) => println!("Start here: course-portal lesson {}", id),
                Landing::Empty => println!("The course has no lessons yet."),
            }
            Ok(())
        }
        Commands::Outline { auth } => {
            let app = App::open(&config)?;
            let session = login(&app, &auth)?;
            print_outline(&app, &session);
            Ok(())
        }
        Commands::Lesson { auth, id } => {
            let app = App::open(&config)?;
            let session = login(&app, &auth)?;
            let ui = Ui::new(app.theme());
            let (module, lesson) = app.open_lesson(&session, &id)?;
            println!("{} / Lesson {}", module.title.to_uppercase(), lesson.order);
            println!("{}\n", ui.heading(&lesson.title));
            for paragraph in lesson.paragraphs() {
                println!("{}\n", paragraph);
            }
            if let Some(url) = &lesson.video_url {
                println!("Video: {}", url);
            }
            if let Some(url) = &lesson.image_url {
                println!("Image: {}", url);
            }
            let done = crate::gating::is_lesson_complete(session.progress(), &lesson.id);
            if done {
                println!("✓ Completed");
            } else {
                println!("Mark as completed: course-portal complete {}", lesson.id);
            }
            Ok(())
        }
        Commands::Complete { auth, id } => {
            let mut app = App::open(&config)?;
            let mut session = login(&app, &auth)?;
            app.complete_lesson(&mut session, &id)?;
            let summary = app.summary(&session);
            println!("✓ Lesson {} completed", id);
            println!("{}", progress_bar(summary.percentage));
            Ok(())
        }
        Commands::Quiz { auth, module, answers } => {
            let mut app = App::open(&config)?;
            let mut session = login(&app, &auth)?;
            run_quiz(&mut app, &mut session, &module, &answers)
        }
        Commands::Progress { auth } => {
            let app = App::open(&config)?;
            let session = login(&app, &auth)?;
            let summary = app.summary(&session);
            let passed = app
                .course()
                .modules
                .iter()
                .filter(|m| crate::gating::is_quiz_passed(session.progress(), &m.id))
                .count();
            println!("Lessons: {}/{}", summary.completed, summary.total);
            println!("Quizzes: {}/{}", passed, app.course().modules.len());
            println!("{}", progress_bar(summary.percentage));
            Ok(())
        }
        Commands::Admin { auth, command } => {
            let mut app = App::open(&config)?;
            let session = login(&app, &auth)?;
            run_admin(&mut app, &session, command)
        }
    }
}

fn login(app: &App, auth: &Credentials) -> Result<Session> {
    app.login(&auth.username, &auth.password)
        .map_err(|e| match e {
            LmsError::InvalidCredentials => anyhow::anyhow!("Invalid username or password"),
            other => other.into(),
        })
}

fn run_quiz(app: &mut App, session: &mut Session, module_id: &str, answers: &[String]) -> Result<()> {
    let ui = Ui::new(app.theme());
    let quiz = app.open_quiz(session, module_id)?.clone();
    let title = app
        .course()
        .module(module_id)
        .map(|m| m.title.clone())
        .unwrap_or_default();

    if answers.is_empty() {
        println!("MODULE ASSESSMENT");
        println!("{}\n", ui.heading(&title));
        for (idx, question) in quiz.questions.iter().enumerate() {
            println!("{}. {}", idx + 1, question.text);
            for (opt, text) in question.options.iter().enumerate() {
                println!("   {}) {}", option_letter(opt), text);
            }
        }
        if quiz.questions.is_empty() {
            println!("This quiz has no questions yet.");
        } else {
            println!("\nSubmit with: course-portal quiz {} --answer 1=A --answer 2=B ...", module_id);
        }
        return Ok(());
    }

    let mut attempt = QuizAttempt::new();
    for raw in answers {
        let (question, option) = parse_answer(raw)?;
        attempt.select(&quiz, question, option)?;
    }

    let outcome = app.submit_quiz(session, module_id, &attempt)?;
    println!(
        "You scored {}% ({}/{}). Passing requires at least {}%.",
        outcome.display_percentage(),
        outcome.correct,
        outcome.total,
        outcome.passing_score
    );
    if outcome.passed {
        println!("{}", ui.heading("Module completed! The next module is unlocked."));
    } else {
        println!("Not quite. Review the module's lessons and try again.");
    }
    Ok(())
}

fn run_admin(app: &mut App, session: &Session, command: AdminCommands) -> Result<()> {
    let ui = Ui::new(app.theme());
    match command {
        AdminCommands::Users => {
            println!("{}", ui.heading("Users"));
            for user in app.users() {
                let star = if user.is_admin() { " *" } else { "" };
                println!("{:<36} {:<16} {}{}", user.id, user.username, user.display_name, star);
            }
        }
        AdminCommands::AddUser { name, login, secret } => {
            let user = app.add_user(session, NewUser {
                display_name: name,
                username: login,
                password: secret,
            })?;
            println!("Added {} ({})", user.display_name, user.id);
        }
        AdminCommands::DeleteUser { id } => {
            app.delete_user(session, &id)?;
            println!("Deleted user {}", id);
        }
        AdminCommands::AddModule { title } => {
            let id = app.add_module(session, &title)?;
            println!("Added module {}", id);
        }
        AdminCommands::DeleteModule { id } => {
            app.delete_module(session, &id)?;
            println!("Deleted module {}", id);
        }
        AdminCommands::AddLesson { module, title } => {
            let id = app.add_lesson(session, &module, &title)?;
            println!("Added lesson {}", id);
        }
        AdminCommands::EditLesson { module, lesson, title, content, video_url, image_url } => {
            app.update_lesson(session, &module, &lesson, LessonEdit {
                title,
                content,
                video_url,
                image_url,
            })?;
            println!("Saved lesson {}", lesson);
        }
        AdminCommands::AddQuestion { module, text, options, correct } => {
            let correct_answer = parse_option(&correct)
                .with_context(|| format!("Invalid correct option '{}'", correct))?;
            let id = app.add_question(session, &module, NewQuestion {
                text,
                options,
                correct_answer,
            })?;
            println!("Added question {}", id);
        }
        AdminCommands::SetPassingScore { module, score } => {
            app.set_passing_score(session, &module, score)?;
            println!("Passing score for {} set to {}%", module, score);
        }
        AdminCommands::Theme { logo_url, primary_color, background_color } => {
            let edit = ThemeEdit {
                logo_url,
                primary_color,
                background_color,
            };
            if !edit.is_empty() {
                app.update_theme(session, edit)?;
            }
            let theme = app.theme();
            let ui = Ui::new(theme);
            println!("{}", ui.heading("Visual identity"));
            println!("Logo:       {}", theme.logo_url);
            println!("Primary:    {}", theme.primary_color);
            println!("Background: {}", theme.background_color);
        }
        AdminCommands::Report => {
            let reports = app.reports(session)?;
            println!("{}", ui.heading("Student progress"));
            if reports.is_empty() {
                println!("No students registered.");
            }
            for row in reports {
                println!(
                    "{:<28} lessons {}/{}  quizzes {}/{}  {}",
                    row.display_name,
                    row.lessons.completed,
                    row.lessons.total,
                    row.quizzes_passed,
                    row.quizzes_total,
                    progress_bar(row.lessons.percentage)
                );
            }
        }
    }
    Ok(())
}

fn run_config(command: ConfigCommands, config: &Config, config_file: &Path) -> Result<()> {
    match command {
        ConfigCommands::Show => {
            let keys = StorageKeys::new(&config.storage.key_prefix, &config.storage.schema_version);
            println!("{}", toml::to_string_pretty(config).context("Failed to serialize config")?);
            println!("# backend:  {}", config.storage.backend);
            if config.storage.backend != Backend::Memory {
                println!("# data dir: {}", config.storage.resolved_data_dir()?.display());
            }
            println!("# keys:     {}", keys.all().join(", "));
        }
        ConfigCommands::Path => {
            println!("{}", config_file.display());
        }
        ConfigCommands::Reset => {
            Config::default().save_to(config_file)?;
            println!("Configuration reset to defaults.");
        }
        ConfigCommands::ResetData { yes } => {
            if !yes {
                bail!("Refusing to delete stored records without --yes");
            }
            let mut storage = Storage::open(&config.storage)?;
            storage.reset()?;
            println!("Stored records removed; defaults apply again.");
        }
    }
    Ok(())
}

fn print_outline(app: &App, session: &Session) {
    let ui = Ui::new(app.theme());
    println!("{}", ui.heading(&app.course().title));
    for module in app.outline(session) {
        let lock = if module.accessible { "" } else { "  [locked]" };
        println!("\nModule {}: {}{}", module.order, module.title, lock);
        for lesson in &module.lessons {
            let tick = if lesson.completed { "✓" } else { " " };
            println!("  [{}] {}  {}", tick, lesson.lesson_id, lesson.title);
        }
        let quiz = if module.quiz_passed { "✓ assessment passed" } else { "take the assessment" };
        println!("  quiz {}: {}", module.module_id, quiz);
    }
    if !session.role().is_admin() {
        println!("\n{}", progress_bar(app.summary(session).percentage));
    }
}

/// Render a fixed-width progress bar
fn progress_bar(percentage: u32) -> String {
    const WIDTH: usize = 20;
    let filled = (percentage.min(100) as usize * WIDTH) / 100;
    format!(
        "Your progress [{}{}] {}%",
        "#".repeat(filled),
        "-".repeat(WIDTH - filled),
        percentage
    )
}

fn option_letter(index: usize) -> char {
    (b'A' + (index % 26) as u8) as char
}

/// Parse an option given as a letter (A, b) or a 1-based number
fn parse_option(raw: &str) -> Result<usize> {
    let raw = raw.trim();
    if let Ok(n) = raw.parse::<usize>() {
        if n == 0 {
            bail!("Options are numbered from 1");
        }
        return Ok(n - 1);
    }
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphabetic() => Ok((c.to_ascii_uppercase() as u8 - b'A') as usize),
        _ => bail!("Expected a letter or number, got '{}'", raw),
    }
}

/// Parse `QUESTION=OPTION` with a 1-based question number
fn parse_answer(raw: &str) -> Result<(usize, usize)> {
    let (question, option) = raw
        .split_once('=')
        .with_context(|| format!("Expected QUESTION=OPTION, got '{}'", raw))?;
    let question: usize = question
        .trim()
        .parse()
        .with_context(|| format!("Invalid question number in '{}'", raw))?;
    if question == 0 {
        bail!("Questions are numbered from 1");
    }
    Ok((question - 1, parse_option(option)?))
}

/// Applies the theme's primary colour to headings when writing to a terminal
struct Ui {
    primary: Option<Color>,
}

impl Ui {
    fn new(theme: &VisualConfig) -> Self {
        let primary = if std::io::stdout().is_terminal() {
            theme.primary_rgb().map(|(r, g, b)| Color::Rgb { r, g, b })
        } else {
            None
        };
        Self { primary }
    }

    fn heading(&self, text: &str) -> String {
        match self.primary {
            Some(color) => text.with(color).bold().to_string(),
            None => text.to_string(),
        }
    }
}
