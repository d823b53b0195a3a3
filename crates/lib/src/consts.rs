pub const APP_NAME: &str = "vore";

/// Tool configuration file, relative to the project root.
pub const CONFIG_FILE: &str = "config.json";

/// Package metadata file, relative to the project root.
pub const PACKAGE_FILE: &str = "package.json";

/// Output tree for transpiled and copied assets.
pub const BUILD_DIR: &str = "build";

/// Per-platform manifest templates live under `dist/<platform>/`.
pub const DIST_TEMPLATE_DIR: &str = "dist";

/// Extension of the packaged archive written at the project root.
pub const ARCHIVE_EXTENSION: &str = "love";

/// Name of the cached runtime download inside a platform staging directory.
pub const RUNTIME_CACHE_FILE: &str = "love.zip";

/// Name the runtime is normalized to inside a platform staging directory.
pub const RUNTIME_DIR: &str = "dist";

/// Push-tool manifest copied next to every published bundle.
pub const ITCH_MANIFEST: &str = ".itch.toml";

/// Stock executables shipped in the Windows runtime. A product may not share
/// their names.
pub const STOCK_EXECUTABLES: &[&str] = &["love", "lovec"];

/// Directories never scanned for source assets.
pub const IGNORED_DIRS: &[&str] = &["build", "dist", "target", "node_modules"];

/// Archive entries excluded when `vore.pack.exclude` is not set.
pub const DEFAULT_PACK_EXCLUDES: &[&str] = &["genobjectxml.lua", "**/*.tmx", "**/*.ase"];

/// File extensions that trigger a rebuild in watch mode.
pub const WATCHED_EXTENSIONS: &[&str] = &["moon", "lua", "tmx", "ase", "wav"];

/// Debounce window for watch mode, in milliseconds.
pub const WATCH_DEBOUNCE_MS: u64 = 300;
