//! Command-line front end: translate messages and maintain the stores.

use std::fs::File;
use std::io::{
    BufReader,
    BufWriter,
    ErrorKind,
    Write,
};
use std::path::{
    Path,
    PathBuf,
};
use std::process::ExitCode;

use clap::{
    Parser,
    Subcommand,
};
use exc_i18n::config::{
    ConfigError,
    ConfigManager,
    language_from_env,
};
use exc_i18n::import::{
    CPythonImporter,
    ImportError,
    PoError,
    export_po,
    import_po,
};
use exc_i18n::{
    StoreError,
    TemplateStore,
    TranslateError,
    TranslationStore,
    Translator,
};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Exit code for a message that was left untranslated.
const EXIT_UNTRANSLATED: u8 = 2;

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "exc-i18n", version, about = "Translate interpreter error messages.")]
struct Cli {
    /// Directory holding `.exc-i18n.json` and the store files.
    #[arg(long, global = true, value_name = "DIR", default_value = ".")]
    dir: PathBuf,

    /// Target language. Overrides the settings file and the locale.
    #[arg(long, global = true, value_name = "LANG")]
    lang: Option<String>,

    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

/// Supported subcommands.
#[derive(Debug, Subcommand)]
enum Command {
    /// Translate one rendered error message.
    Translate {
        /// Error category, e.g. `NameError`.
        category: String,
        /// The message as the interpreter rendered it.
        message: String,
    },
    /// Rebuild the template store from a CPython source tree.
    Scrape {
        /// Root of the CPython checkout.
        #[arg(value_name = "CPYTHON_ROOT")]
        source_root: PathBuf,
    },
    /// Write every template to a PO file for translators.
    ExportPo {
        /// Output PO file.
        out: PathBuf,
    },
    /// Merge a translated PO file into the translation store.
    ImportPo {
        /// Translated PO file.
        po_file: PathBuf,
        /// Language of the translations in the file.
        language: String,
    },
}

/// Failures reported by the binary.
#[derive(Error, Debug)]
enum CliError {
    /// Invalid or unreadable settings file.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A store file could not be read or written.
    #[error("Store '{path}': {source}")]
    Store {
        /// Store file.
        path: PathBuf,
        /// Underlying failure.
        #[source]
        source: StoreError,
    },

    /// A file could not be opened or created.
    #[error("Failed to access '{path}': {source}")]
    Io {
        /// File being accessed.
        path: PathBuf,
        /// Underlying failure.
        #[source]
        source: std::io::Error,
    },

    /// stdout or stderr is gone.
    #[error("Failed to write output: {0}")]
    Output(#[source] std::io::Error),

    /// PO file failure.
    #[error(transparent)]
    Po(#[from] PoError),

    /// Scraper failure.
    #[error(transparent)]
    Import(#[from] ImportError),

    /// Translation failed for a reason other than a missing template or translation.
    #[error(transparent)]
    Translate(#[from] TranslateError),
}

/// CLI entrypoint.
fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(code) => code,
        Err(err) => report_error(&err),
    }
}

/// Executes the parsed command.
fn run(cli: &Cli) -> Result<ExitCode, CliError> {
    let mut manager = ConfigManager::new();
    manager.load_settings(Some(cli.dir.clone()))?;

    match &cli.command {
        Command::Translate { category, message } => {
            let language = cli.lang.clone().unwrap_or_else(|| {
                manager.resolve_language(language_from_env(|name| std::env::var(name).ok()))
            });
            translate(&manager, &language, category, message)
        }
        Command::Scrape { source_root } => {
            let importer =
                CPythonImporter::new(source_root.clone(), &manager.get_settings().importer)?;
            let templates = importer.do_import();
            let path = manager.template_store_path();
            save_store(&path, |sink| templates.dump(sink))?;
            report(&format!("Wrote {} templates to {}", templates.len(), path.display()))?;
            Ok(ExitCode::SUCCESS)
        }
        Command::ExportPo { out } => {
            let templates = load_store(&manager.template_store_path(), TemplateStore::load)?;
            let file = File::create(out)
                .map_err(|source| CliError::Io { path: out.clone(), source })?;
            export_po(&templates, BufWriter::new(file))?;
            Ok(ExitCode::SUCCESS)
        }
        Command::ImportPo { po_file, language } => {
            let path = manager.translation_store_path();
            let mut translations = load_store(&path, TranslationStore::load)?;
            let file = File::open(po_file)
                .map_err(|source| CliError::Io { path: po_file.clone(), source })?;
            let records = import_po(BufReader::new(file), language)?;
            let imported = records.len();
            translations.extend(records);
            save_store(&path, |sink| translations.dump(sink))?;
            report(&format!(
                "Imported {imported} {language} translations into {}",
                path.display()
            ))?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Translates one message, echoing it untranslated when no translation applies.
fn translate(
    manager: &ConfigManager,
    language: &str,
    category: &str,
    message: &str,
) -> Result<ExitCode, CliError> {
    let templates = load_store(&manager.template_store_path(), TemplateStore::load)?;
    let translations = load_store(&manager.translation_store_path(), TranslationStore::load)?;
    let translator = Translator::new(templates, translations)
        .with_syntax(manager.placeholder_syntax())
        .with_language(language);

    match translator.translate(category, message) {
        Ok(translated) => {
            print_line(&translated)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) if err.is_not_found() => {
            tracing::info!(%err, "Message left untranslated");
            print_line(message)?;
            Ok(ExitCode::from(EXIT_UNTRANSLATED))
        }
        Err(err) => Err(err.into()),
    }
}

/// Reads a store file; a missing file is an empty store.
fn load_store<T, F>(path: &Path, load: F) -> Result<T, CliError>
where
    T: Default,
    F: FnOnce(BufReader<File>) -> Result<T, StoreError>,
{
    match File::open(path) {
        Ok(file) => load(BufReader::new(file))
            .map_err(|source| CliError::Store { path: path.to_path_buf(), source }),
        Err(err) if err.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "Store file not found, starting empty");
            Ok(T::default())
        }
        Err(source) => Err(CliError::Io { path: path.to_path_buf(), source }),
    }
}

/// Writes a store file, creating its directory when needed.
fn save_store<F>(path: &Path, dump: F) -> Result<(), CliError>
where
    F: FnOnce(BufWriter<File>) -> Result<(), StoreError>,
{
    let io_error = |source| CliError::Io { path: path.to_path_buf(), source };
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(io_error)?;
    }
    let file = File::create(path).map_err(io_error)?;
    dump(BufWriter::new(file))
        .map_err(|source| CliError::Store { path: path.to_path_buf(), source })
}

/// Writes a result line to stdout.
fn print_line(line: &str) -> Result<(), CliError> {
    writeln!(std::io::stdout().lock(), "{line}").map_err(CliError::Output)
}

/// Writes a status line to stderr.
fn report(line: &str) -> Result<(), CliError> {
    writeln!(std::io::stderr().lock(), "{line}").map_err(CliError::Output)
}

/// Reports a failure to stderr and returns the failure exit code.
fn report_error(err: &CliError) -> ExitCode {
    let _ = writeln!(std::io::stderr(), "Error: {err}");
    ExitCode::FAILURE
}
