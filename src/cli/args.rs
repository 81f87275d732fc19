//! CLI argument structs for all subcommands.

use clap::Parser;

#[derive(Parser, Debug)]
#[command(after_long_help = r#"WHAT IT DOES:
  Tokenizes the given sources and classifies every identifier followed by
  an argument list. An occurrence counts as a free-function call unless the
  preceding token makes it a definition (`function foo(`), a method call
  (`->foo(`), a scoped call (`::foo(`), or an instantiation (`new Foo(`).
  Every occurrence is printed, duplicates included, with its token index.

EXAMPLES:
  Scan two files:      funcmock scan weather.module helpers.inc
  Scan a directory:    funcmock scan -d modules/custom -e php,module,inc
  Only drupal_* calls: funcmock scan -d . --filter '^drupal_'
  Machine output:      funcmock scan -d . --json
"#)]
pub struct ScanArgs {
    /// Source files to scan, in order. When given, --dir/--ext are ignored.
    pub files: Vec<String>,

    /// Directory to walk for sources when no files are listed
    #[arg(short, long, default_value = ".")]
    pub dir: String,

    /// File extensions to include in the walk, comma-separated
    #[arg(short, long, default_value = "php")]
    pub ext: String,

    /// Only report names matching this regex
    #[arg(long)]
    pub filter: Option<String>,

    /// Emit JSON instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
#[command(after_long_help = r#"WHAT IT DOES:
  Runs the full detection pipeline: load sources, tokenize, classify call
  sites, then subtract every name that already has an implementation —
  functions declared in the scanned sources themselves plus any ambient
  names passed with --ambient. What remains is the set of functions a test
  run would need mocks for, printed deduplicated and sorted.

EXAMPLES:
  Detect over a module:   funcmock detect modules/custom/weather/weather.module
  Whole directory:        funcmock detect -d modules/custom -e php,module
  With host builtins:     funcmock detect -d . --ambient strlen,count,explode
  Show definitions too:   funcmock detect -d . --defs
  Machine output:         funcmock detect -d . --json
"#)]
pub struct DetectArgs {
    /// Source files to scan, in order. When given, --dir/--ext are ignored.
    pub files: Vec<String>,

    /// Directory to walk for sources when no files are listed
    #[arg(short, long, default_value = ".")]
    pub dir: String,

    /// File extensions to include in the walk, comma-separated
    #[arg(short, long, default_value = "php")]
    pub ext: String,

    /// Ambient function names to treat as already defined, comma-separated
    #[arg(long)]
    pub ambient: Option<String>,

    /// Also print the function definitions found in the sources
    #[arg(long)]
    pub defs: bool,

    /// Only report names matching this regex
    #[arg(long)]
    pub filter: Option<String>,

    /// Emit JSON instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
#[command(after_long_help = r#"WHAT IT DOES:
  Runs detection like `detect`, then renders the forwarding shim each
  mocked function stands in for, as PHP-style source text. Diagnostic
  output only — nothing evaluates it; the real callables live in the
  in-process dispatch table.

EXAMPLES:
  Shims for a module:   funcmock stubs modules/custom/weather/weather.module
  With host builtins:   funcmock stubs -d . --ambient strlen,count
"#)]
pub struct StubsArgs {
    /// Source files to scan, in order. When given, --dir/--ext are ignored.
    pub files: Vec<String>,

    /// Directory to walk for sources when no files are listed
    #[arg(short, long, default_value = ".")]
    pub dir: String,

    /// File extensions to include in the walk, comma-separated
    #[arg(short, long, default_value = "php")]
    pub ext: String,

    /// Ambient function names to treat as already defined, comma-separated
    #[arg(long)]
    pub ambient: Option<String>,
}
