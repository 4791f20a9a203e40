use std::path::{Path, PathBuf};

use crate::arena::NodeKind;
use crate::model::ElementKind;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Icon resource paths per node variant.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IconTheme {
    pub model: PathBuf,
    pub group: PathBuf,
    pub body: PathBuf,
    pub joint: PathBuf,
    pub coordinate: PathBuf,
    pub force: PathBuf,
    pub marker: PathBuf,
    pub other: PathBuf,
}

impl IconTheme {
    /// Theme without icons; decoration queries return nothing.
    pub fn empty() -> Self {
        Self {
            model: PathBuf::new(),
            group: PathBuf::new(),
            body: PathBuf::new(),
            joint: PathBuf::new(),
            coordinate: PathBuf::new(),
            force: PathBuf::new(),
            marker: PathBuf::new(),
            other: PathBuf::new(),
        }
    }

    pub fn icon_for(&self, kind: &NodeKind) -> &Path {
        match kind {
            NodeKind::Root => Path::new(""),
            NodeKind::Model(_) => &self.model,
            NodeKind::Element { kind, .. } => match kind {
                ElementKind::Group => &self.group,
                ElementKind::Body => &self.body,
                ElementKind::Joint => &self.joint,
                ElementKind::Coordinate => &self.coordinate,
                ElementKind::Force => &self.force,
                ElementKind::Marker => &self.marker,
                ElementKind::Other => &self.other,
            },
        }
    }
}

impl Default for IconTheme {
    fn default() -> Self {
        Self {
            model: PathBuf::from(":/icons/model.png"),
            group: PathBuf::from(":/icons/folder.png"),
            body: PathBuf::from(":/icons/body.png"),
            joint: PathBuf::from(":/icons/joint.png"),
            coordinate: PathBuf::from(":/icons/coordinate.png"),
            force: PathBuf::from(":/icons/muscle.png"),
            marker: PathBuf::from(":/icons/marker.png"),
            other: PathBuf::from(":/icons/component.png"),
        }
    }
}

/// Navigator configuration.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavigatorConfig {
    /// Label of the hidden root node.
    pub root_label: String,
    /// Source tag passed to the logger.
    pub log_tag: String,
    pub icons: IconTheme,
}

impl NavigatorConfig {
    #[must_use]
    pub fn root_label(mut self, label: impl Into<String>) -> Self {
        self.root_label = label.into();
        self
    }

    #[must_use]
    pub fn log_tag(mut self, tag: impl Into<String>) -> Self {
        self.log_tag = tag.into();
        self
    }

    #[must_use]
    pub fn icons(mut self, icons: IconTheme) -> Self {
        self.icons = icons;
        self
    }
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            root_label: "the root".to_owned(),
            log_tag: "NavigatorModel".to_owned(),
            icons: IconTheme::default(),
        }
    }
}
