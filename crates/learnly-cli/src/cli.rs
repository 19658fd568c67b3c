use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Chat { messages: Vec<String> },
    Plan { goal: Option<String> },
    Search { query: String },
    EditImage {
        course_id: String,
        prompt: String,
        apply: bool,
    },
    Courses,
}

impl Command {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Chat { .. } => "chat",
            Self::Plan { .. } => "plan",
            Self::Search { .. } => "search",
            Self::EditImage { .. } => "edit-image",
            Self::Courses => "courses",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliOptions {
    pub command: Command,
    pub exclude_greeting: bool,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CliError {
    #[error("missing command")]
    MissingCommand,
    #[error("unknown command: {0}")]
    UnknownCommand(String),
    #[error("unknown argument: {0}")]
    UnknownArgument(String),
    #[error("missing value for {0}")]
    MissingValue(&'static str),
    #[error("--apply is only supported by edit-image")]
    ApplyRequiresEditImage,
    #[error("help requested")]
    HelpRequested,
}

impl CliOptions {
    pub fn parse<I>(args: I) -> Result<Self, CliError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut exclude_greeting = false;
        let mut apply = false;
        let mut positional = Vec::new();

        for arg in args {
            match arg.as_str() {
                "--help" | "-h" => return Err(CliError::HelpRequested),
                "--exclude-greeting" => exclude_greeting = true,
                "--apply" => apply = true,
                flag if flag.starts_with("--") => {
                    return Err(CliError::UnknownArgument(flag.to_string()));
                }
                _ => positional.push(arg),
            }
        }

        let mut positional = positional.into_iter();
        let name = positional.next().ok_or(CliError::MissingCommand)?;
        let rest = positional.collect::<Vec<_>>();

        let command = match name.as_str() {
            "chat" => {
                if rest.is_empty() {
                    return Err(CliError::MissingValue("chat MESSAGE"));
                }
                Command::Chat { messages: rest }
            }
            "plan" => Command::Plan {
                goal: non_empty_join(&rest),
            },
            "search" => Command::Search {
                query: non_empty_join(&rest).ok_or(CliError::MissingValue("search QUERY"))?,
            },
            "edit-image" => {
                let (course_id, prompt) = rest
                    .split_first()
                    .ok_or(CliError::MissingValue("edit-image COURSE_ID"))?;
                Command::EditImage {
                    course_id: course_id.clone(),
                    prompt: non_empty_join(prompt)
                        .ok_or(CliError::MissingValue("edit-image PROMPT"))?,
                    apply,
                }
            }
            "courses" => Command::Courses,
            unknown => return Err(CliError::UnknownCommand(unknown.to_string())),
        };

        if apply && !matches!(command, Command::EditImage { .. }) {
            return Err(CliError::ApplyRequiresEditImage);
        }

        Ok(Self {
            command,
            exclude_greeting,
        })
    }
}

fn non_empty_join(words: &[String]) -> Option<String> {
    let joined = words.join(" ");
    let trimmed = joined.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
