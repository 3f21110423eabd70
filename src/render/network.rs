//! Interactive network document
//!
//! Converts a [`CooccurrenceGraph`] into the node/edge document consumed by
//! vis-network style viewers. Field names follow that format (`from`, `to`,
//! `borderWidth`), so the JSON can be handed to the viewer unchanged.

use serde::Serialize;

use super::font::FontChoice;
use crate::errors::Result;
use crate::graph::CooccurrenceGraph;

const GOTHIC_STACK: &str = "IPAexGothic, IPAPGothic, Gothic, sans-serif";
const MINCHO_STACK: &str = "IPAexMincho, IPAPMincho, Mincho, serif";

const LABEL_SIZE: u32 = 14;
const TEXT_COLOR: &str = "#333333";
const NODE_BORDER: &str = "#666666";
const NODE_BACKGROUND: &str = "#D2E5FF";
const EDGE_COLOR: &str = "#cccccc";
const EDGE_HIGHLIGHT: &str = "#848484";
const EDGE_OPACITY: f64 = 0.6;

/// CSS font-face value for node labels drawn with `family`.
pub fn font_face_for(family: &str) -> String {
    let lower = family.to_lowercase();
    if lower.contains("gothic") || lower.contains("ipagp") {
        GOTHIC_STACK.to_string()
    } else if lower.contains("mincho") || lower.contains("ipamp") {
        MINCHO_STACK.to_string()
    } else {
        family.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelFont {
    pub face: String,
    pub size: u32,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeColor {
    pub border: &'static str,
    pub background: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisNode {
    pub id: String,
    pub label: String,
    pub size: u32,
    /// Hover text
    pub title: String,
    pub font: LabelFont,
    pub border_width: u32,
    pub color: NodeColor,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeColor {
    pub color: &'static str,
    pub highlight: &'static str,
    pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisEdge {
    pub from: String,
    pub to: String,
    pub value: f64,
    pub title: String,
    pub color: EdgeColor,
}

/// Canvas settings for the viewer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Canvas {
    pub height: &'static str,
    pub width: &'static str,
    pub background: &'static str,
    pub directed: bool,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            height: "750px",
            width: "100%",
            background: "#F5F5F5",
            directed: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkView {
    pub nodes: Vec<VisNode>,
    pub edges: Vec<VisEdge>,
    pub font_face: String,
    pub canvas: Canvas,
}

impl NetworkView {
    pub fn from_graph(graph: &CooccurrenceGraph, font: &FontChoice) -> Self {
        let font_face = font_face_for(&font.family);

        let nodes = graph
            .nodes()
            .iter()
            .map(|n| VisNode {
                id: n.lemma.clone(),
                label: n.lemma.clone(),
                size: n.size,
                title: format!("{} (出現数: {})", n.lemma, n.count),
                font: LabelFont {
                    face: font_face.clone(),
                    size: LABEL_SIZE,
                    color: TEXT_COLOR,
                },
                border_width: 1,
                color: NodeColor {
                    border: NODE_BORDER,
                    background: NODE_BACKGROUND,
                },
            })
            .collect();

        let edges = graph
            .edges()
            .iter()
            .map(|e| VisEdge {
                from: e.source.clone(),
                to: e.target.clone(),
                value: e.weight,
                title: format!("共起: {}回", e.count),
                color: EdgeColor {
                    color: EDGE_COLOR,
                    highlight: EDGE_HIGHLIGHT,
                    opacity: EDGE_OPACITY,
                },
            })
            .collect();

        Self {
            nodes,
            edges,
            font_face,
            canvas: Canvas::default(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
