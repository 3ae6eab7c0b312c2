//! Typed configuration, mirroring the dynamic `opts` map of the source: a
//! `TreeOptions` builder for normal Rust callers, and
//! [`TreeOptions::from_pairs`] for callers that receive options as a dynamic
//! map (a config file, an FFI boundary) where unknown keys must be dropped
//! silently rather than rejected.

/// Node-map backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// A plain key→record mapping.
    Plain,
    /// A mapping that also tracks per-key content hashes for cheap diffing.
    HashSummarized,
}

impl Default for Backend {
    fn default() -> Self {
        Backend::Plain
    }
}

/// Whether the tree mirrors its node map into a CRDT.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// No replication; the tree is the sole source of truth.
    Standalone,
    /// Every mutation is diffed and submitted to a [`crate::replication::CrdtHandle`].
    Distributed,
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Standalone
    }
}

/// A single dynamic option value, used by [`TreeOptions::from_pairs`].
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    /// An integer value (`width`, `seed`).
    Int(i64),
    /// A boolean value (`verbose`).
    Bool(bool),
    /// A string value (`type`, `mode`).
    Str(String),
}

/// Typed, validated configuration for a [`crate::rtree::Tree`] /
/// [`crate::dispatcher::Dispatcher`].
#[derive(Debug, Clone, PartialEq)]
pub struct TreeOptions {
    width: usize,
    backend: Backend,
    mode: Mode,
    verbose: bool,
    seed: u64,
}

const DEFAULT_WIDTH: usize = 6;
const DEFAULT_SEED: u64 = 0;

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            backend: Backend::default(),
            mode: Mode::default(),
            verbose: false,
            seed: DEFAULT_SEED,
        }
    }
}

impl TreeOptions {
    /// Sets the maximum number of children per branch. Values of `0` are
    /// silently ignored in favor of the default; invalid configuration is
    /// dropped rather than rejected.
    pub fn width(mut self, width: usize) -> Self {
        if width > 0 {
            self.width = width;
        }
        self
    }

    /// Sets the node-map backend.
    pub fn backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }

    /// Sets the replication mode. `Distributed` forces the backend to
    /// `HashSummarized`, since only it can diff cheaply.
    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        if mode == Mode::Distributed {
            self.backend = Backend::HashSummarized;
        }
        self
    }

    /// Enables or disables the verbose diagnostic dump.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Sets the id generator's seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Builds options from a dynamic set of key/value pairs, as would arrive
    /// from a config file or an FFI boundary. Unrecognized keys and
    /// out-of-range or mistyped values are silently dropped in favor of
    /// defaults.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, OptionValue)>) -> Self {
        let mut opts = Self::default();
        for (key, value) in pairs {
            match (key.as_str(), value) {
                ("width", OptionValue::Int(w)) if w > 0 => opts = opts.width(w as usize),
                ("seed", OptionValue::Int(s)) => opts = opts.seed(s as u64),
                ("verbose", OptionValue::Bool(v)) => opts = opts.verbose(v),
                ("type", OptionValue::Str(ref s)) if s == "Plain" => {
                    opts = opts.backend(Backend::Plain)
                }
                ("type", OptionValue::Str(ref s)) if s == "HashSummarized" => {
                    opts = opts.backend(Backend::HashSummarized)
                }
                ("mode", OptionValue::Str(ref s)) if s == "Standalone" => {
                    opts = opts.mode(Mode::Standalone)
                }
                ("mode", OptionValue::Str(ref s)) if s == "Distributed" => {
                    opts = opts.mode(Mode::Distributed)
                }
                // Unknown key, or a recognized key with an out-of-range/mistyped
                // value: dropped silently, default stands.
                _ => {}
            }
        }
        opts
    }

    /// The configured maximum number of children per branch.
    pub fn get_width(&self) -> usize {
        self.width
    }

    /// The configured node-map backend.
    pub fn get_backend(&self) -> Backend {
        self.backend
    }

    /// The configured replication mode.
    pub fn get_mode(&self) -> Mode {
        self.mode
    }

    /// Whether verbose diagnostics are enabled.
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// The configured id generator seed.
    pub fn get_seed(&self) -> u64 {
        self.seed
    }
}
