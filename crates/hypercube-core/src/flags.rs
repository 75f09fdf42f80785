//! Descriptive, numpy-style properties of a cube.
//!
//! These are metadata only: nothing is enforced through them except that a
//! cube reporting `writeable == false` rejects writes.

/// Boolean properties describing a cube's memory layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Flags {
    pub aligned: bool,
    pub behaved: bool,
    pub c_contiguous: bool,
    pub owndata: bool,
    pub writeable: bool,
}

impl Flags {
    /// Flags of a contiguous store that owns its elements
    pub const OWNED_CONTIGUOUS: Flags = Flags {
        aligned: true,
        behaved: true,
        c_contiguous: true,
        owndata: true,
        writeable: true,
    };

    /// Flags of a non-contiguous, writeable view
    pub const VIEW: Flags = Flags {
        aligned: false,
        behaved: false,
        c_contiguous: false,
        owndata: true,
        writeable: true,
    };

    pub fn with_owndata(mut self, owndata: bool) -> Self {
        self.owndata = owndata;
        self
    }

    pub fn with_writeable(mut self, writeable: bool) -> Self {
        self.writeable = writeable;
        self
    }

    pub fn with_aligned(mut self, aligned: bool) -> Self {
        self.aligned = aligned;
        self
    }

    /// `(name, value)` pairs using the numpy flag names
    pub fn entries(&self) -> [(&'static str, bool); 5] {
        [
            ("aligned", self.aligned),
            ("behaved", self.behaved),
            ("c_contiguous", self.c_contiguous),
            ("owndata", self.owndata),
            ("writeable", self.writeable),
        ]
    }

    /// Look a flag up by its numpy name
    pub fn get(&self, name: &str) -> Option<bool> {
        self.entries()
            .into_iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v)
    }
}
