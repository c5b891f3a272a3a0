//! Analysed components and their granularity.

use std::fmt;

/// Kind of component a measure is computed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Qualifier {
    Project,
    Module,
    Directory,
    Package,
    File,
    Class,
    UnitTestFile,
    Library,
}

impl Qualifier {
    /// File-level components (and anything below them) are the only ones
    /// subject to best-value skipping.
    pub fn is_file_level(self) -> bool {
        matches!(self, Self::File | Self::Class | Self::UnitTestFile)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Project => "TRK",
            Self::Module => "BRC",
            Self::Directory => "DIR",
            Self::Package => "PAC",
            Self::File => "FIL",
            Self::Class => "CLA",
            Self::UnitTestFile => "UTS",
            Self::Library => "LIB",
        }
    }
}

impl fmt::Display for Qualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A project, module, package, file, or other analysed resource.
///
/// Identity is the human-readable `key`; two components with the same key
/// are the same component.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Component {
    pub key: String,
    pub qualifier: Qualifier,
}

impl Component {
    pub fn new(key: impl Into<String>, qualifier: Qualifier) -> Self {
        Self {
            key: key.into(),
            qualifier,
        }
    }

    pub fn project(key: impl Into<String>) -> Self {
        Self::new(key, Qualifier::Project)
    }

    pub fn module(key: impl Into<String>) -> Self {
        Self::new(key, Qualifier::Module)
    }

    pub fn package(key: impl Into<String>) -> Self {
        Self::new(key, Qualifier::Package)
    }

    pub fn file(key: impl Into<String>) -> Self {
        Self::new(key, Qualifier::File)
    }

    pub fn is_file_level(&self) -> bool {
        self.qualifier.is_file_level()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_files_and_below_are_file_level() {
        assert!(Component::file("org.foo.Bar").is_file_level());
        assert!(Component::new("BarTest", Qualifier::UnitTestFile).is_file_level());
        assert!(Component::new("Bar", Qualifier::Class).is_file_level());
        assert!(!Component::project("foo").is_file_level());
        assert!(!Component::package("org.foo").is_file_level());
        assert!(!Component::module("foo:core").is_file_level());
        assert!(!Component::new("src", Qualifier::Directory).is_file_level());
    }
}
