//! Portal lists: world points that transit the hero to another zone.
//!
//! One portal per line, `"<x>,<y> <name>"`. Blank lines and `#` comments are
//! skipped.

use glam::{Vec2, vec2};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use thiserror::Error;

static LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(-?[0-9]+(?:\.[0-9]+)?),(-?[0-9]+(?:\.[0-9]+)?)\s+(\S+)")
        .expect("portal line pattern is valid")
});

#[derive(Error, Debug)]
pub enum PortalError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("portal line {0} is not \"<x>,<y> <name>\"")]
    BadLine(usize),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Portal {
    pub pos: Vec2,
    pub name: String,
}

#[derive(Clone, Debug, Default)]
pub struct Portals {
    pub portal: Vec<Portal>,
}

impl Portals {
    pub fn parse(text: &str) -> Result<Self, PortalError> {
        let mut portal = Vec::new();
        for (i, line) in text.lines().enumerate() {
            let line = line.split('#').next().unwrap_or("");
            if line.trim().is_empty() {
                continue;
            }
            let caps = LINE.captures(line).ok_or(PortalError::BadLine(i + 1))?;
            let x: f32 = caps[1].parse().map_err(|_| PortalError::BadLine(i + 1))?;
            let y: f32 = caps[2].parse().map_err(|_| PortalError::BadLine(i + 1))?;
            portal.push(Portal {
                pos: vec2(x, y),
                name: caps[3].to_string(),
            });
        }
        Ok(Self { portal })
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, PortalError> {
        Self::parse(&std::fs::read_to_string(path)?)
    }

    /// The first portal within `reach` of `p`, if any.
    pub fn near(&self, p: Vec2, reach: f32) -> Option<&Portal> {
        self.portal.iter().find(|t| (t.pos - p).length() < reach)
    }
}
