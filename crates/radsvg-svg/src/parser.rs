//! Document parser: XML tree to scene arena.

use std::collections::{HashMap, HashSet};

use radsvg_canvas::{Path2D, Rect, Transform};
use roxmltree::{Node, ParsingOptions};
use tracing::{debug, trace, warn};

use crate::attributes::{parse_points, parse_transform, parse_view_box, SvgLength, ViewBoxError};
use crate::document::{GroupRole, NodeId, NodeKind, SceneNode, Shape, SvgDocument};
use crate::error::{GeometryWarning, ParseError};
use crate::path_data::parse_path_data;
use crate::style::ResolvedStyle;

const XLINK_NS: &str = "http://www.w3.org/1999/xlink";

/// Deepest element nesting accepted by the parser.
pub const MAX_NESTING_DEPTH: usize = 256;

/// Deepest `use` expansion kept; references that would nest further lose their target.
pub const MAX_EXPANSION_DEPTH: usize = 256;

impl SvgDocument {
    /// Parse an SVG document from text.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let options = ParsingOptions {
            allow_dtd: true,
            ..ParsingOptions::default()
        };
        let xml = roxmltree::Document::parse_with_options(text, options)?;
        let root = xml.root_element();

        if root.tag_name().name() != "svg" {
            return Err(ParseError::NotSvg(root.tag_name().name().to_string()));
        }

        let width = intrinsic_length(root.attribute("width"));
        let height = intrinsic_length(root.attribute("height"));

        let view_box = match root.attribute("viewBox") {
            Some(value) => parse_view_box(value).map_err(|e| {
                let reason = match e {
                    ViewBoxError::NotNumeric => "not a number list",
                    ViewBoxError::WrongCount => "expected four numbers",
                    ViewBoxError::Negative => "negative width or height",
                };
                ParseError::InvalidViewBox(format!("{value} ({reason})"))
            })?,
            None if width > 0 && height > 0 => Rect::new(0.0, 0.0, width as f32, height as f32),
            None => Rect::ZERO,
        };

        let mut builder = Builder::new(view_box);
        let root_id = builder.build_container(root, GroupRole::Normal, Transform::identity(), 0)?;
        builder.resolve_references();
        builder.limit_expansion_depth();

        let document = SvgDocument {
            width,
            height,
            view_box,
            nodes: builder.nodes,
            root: root_id,
            ids: builder.ids,
            warnings: builder.warnings,
        };

        for warning in document.warnings() {
            warn!(%warning, "SVG geometry warning");
        }
        debug!(
            nodes = document.node_count(),
            width = document.width,
            height = document.height,
            "Parsed SVG document"
        );

        Ok(document)
    }

    /// Parse an SVG document from UTF-8 bytes. A leading byte-order mark is ignored.
    pub fn parse_bytes(data: &[u8]) -> Result<Self, ParseError> {
        let data = data.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(data);
        let text = std::str::from_utf8(data)?;
        Self::parse(text)
    }
}

/// Root `width`/`height`: absolute lengths rounded to whole pixels; anything else is 0.
fn intrinsic_length(value: Option<&str>) -> u32 {
    value
        .and_then(SvgLength::parse)
        .filter(|l| !l.is_percent())
        .map(|l| l.to_px(0.0))
        .filter(|px| px.is_finite() && *px > 0.0)
        .map(|px| px.round() as u32)
        .unwrap_or(0)
}

// ==================== Tree Builder ====================

struct Builder {
    view_box: Rect,
    nodes: Vec<SceneNode>,
    ids: HashMap<String, NodeId>,
    warnings: Vec<GeometryWarning>,
}

impl Builder {
    fn new(view_box: Rect) -> Self {
        Self {
            view_box,
            nodes: Vec::new(),
            ids: HashMap::new(),
            warnings: Vec::new(),
        }
    }

    /// Build one element and its subtree. Returns `None` for skipped elements.
    fn build_element(
        &mut self,
        node: Node<'_, '_>,
        depth: usize,
    ) -> Result<Option<NodeId>, ParseError> {
        let name = node.tag_name().name();
        let id = match name {
            "g" | "a" | "switch" => {
                self.build_container(node, GroupRole::Normal, Transform::identity(), depth)?
            }
            "svg" => {
                let offset = Transform::translate(
                    self.length(node, "x", Axis::X),
                    self.length(node, "y", Axis::Y),
                );
                self.build_container(node, GroupRole::Normal, offset, depth)?
            }
            "defs" => {
                self.build_container(node, GroupRole::Definitions, Transform::identity(), depth)?
            }
            "symbol" => {
                self.build_container(node, GroupRole::Symbol, Transform::identity(), depth)?
            }
            "path" => {
                let kind = NodeKind::Path(self.path_geometry(node));
                self.push(node, kind)
            }
            "rect" => {
                let kind = NodeKind::Shape(self.rect(node));
                self.push(node, kind)
            }
            "circle" => {
                let kind = NodeKind::Shape(Shape::Circle {
                    cx: self.length(node, "cx", Axis::X),
                    cy: self.length(node, "cy", Axis::Y),
                    r: self.length(node, "r", Axis::Diagonal),
                });
                self.push(node, kind)
            }
            "ellipse" => {
                let kind = NodeKind::Shape(Shape::Ellipse {
                    cx: self.length(node, "cx", Axis::X),
                    cy: self.length(node, "cy", Axis::Y),
                    rx: self.length(node, "rx", Axis::X),
                    ry: self.length(node, "ry", Axis::Y),
                });
                self.push(node, kind)
            }
            "line" => {
                let kind = NodeKind::Shape(Shape::Line {
                    x1: self.length(node, "x1", Axis::X),
                    y1: self.length(node, "y1", Axis::Y),
                    x2: self.length(node, "x2", Axis::X),
                    y2: self.length(node, "y2", Axis::Y),
                });
                self.push(node, kind)
            }
            "polyline" | "polygon" => {
                let (points, well_formed) = parse_points(node.attribute("points").unwrap_or(""));
                if !well_formed {
                    self.warnings.push(GeometryWarning::MalformedPoints {
                        id: node.attribute("id").map(str::to_string),
                    });
                }
                let shape = if name == "polygon" {
                    Shape::Polygon(points)
                } else {
                    Shape::Polyline(points)
                };
                self.push(node, NodeKind::Shape(shape))
            }
            "text" => {
                let kind = NodeKind::Text {
                    x: first_coordinate(node.attribute("x")),
                    y: first_coordinate(node.attribute("y")),
                    content: text_content(node),
                };
                self.push(node, kind)
            }
            "use" => {
                let href = node
                    .attribute("href")
                    .or_else(|| node.attribute((XLINK_NS, "href")))
                    .unwrap_or("");
                let kind = NodeKind::Use {
                    href: href.trim().trim_start_matches('#').to_string(),
                    target: None,
                    x: self.length(node, "x", Axis::X),
                    y: self.length(node, "y", Axis::Y),
                };
                self.push(node, kind)
            }
            other => {
                trace!(element = other, "Skipping unsupported SVG element");
                return Ok(None);
            }
        };
        Ok(Some(id))
    }

    /// Build a group. The node is pushed before its children so the arena stays in pre-order.
    fn build_container(
        &mut self,
        node: Node<'_, '_>,
        role: GroupRole,
        offset: Transform,
        depth: usize,
    ) -> Result<NodeId, ParseError> {
        if depth >= MAX_NESTING_DEPTH {
            return Err(ParseError::NestingTooDeep(MAX_NESTING_DEPTH));
        }

        let id = self.push(
            node,
            NodeKind::Group {
                children: Vec::new(),
                role,
            },
        );
        if !offset.is_identity() {
            let slot = &mut self.nodes[id.0];
            slot.transform = slot.transform.multiply(&offset);
        }

        let mut children = Vec::new();
        for child in node.children().filter(Node::is_element) {
            if let Some(child) = self.build_element(child, depth + 1)? {
                children.push(child);
            }
        }

        if let NodeKind::Group { children: slot, .. } = &mut self.nodes[id.0].kind {
            *slot = children;
        }
        Ok(id)
    }

    fn push(&mut self, node: Node<'_, '_>, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        let element_id = node.attribute("id").filter(|s| !s.is_empty()).map(str::to_string);
        if let Some(element_id) = &element_id {
            self.ids.entry(element_id.clone()).or_insert(id);
        }

        let transform = match node.attribute("transform") {
            Some(value) => parse_transform(value).unwrap_or_else(|| {
                self.warnings.push(GeometryWarning::MalformedTransform {
                    value: value.to_string(),
                });
                Transform::identity()
            }),
            None => Transform::identity(),
        };

        let classes = node
            .attribute("class")
            .map(|c| c.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default();

        let presentation = node
            .attributes()
            .filter(|a| a.namespace().is_none())
            .map(|a| (a.name(), a.value()));
        let style = ResolvedStyle::from_attributes(presentation, node.attribute("style"));

        self.nodes.push(SceneNode {
            id: element_id,
            classes,
            transform,
            style,
            kind,
        });
        id
    }

    fn path_geometry(&mut self, node: Node<'_, '_>) -> Path2D {
        let d = node.attribute("d").unwrap_or("");
        match parse_path_data(d) {
            Ok(path) => path,
            Err(e) => {
                self.warnings.push(GeometryWarning::MalformedPathData {
                    id: node.attribute("id").map(str::to_string),
                    reason: e.to_string(),
                });
                Path2D::new()
            }
        }
    }

    fn rect(&self, node: Node<'_, '_>) -> Shape {
        let rx = self.optional_length(node, "rx", Axis::X);
        let ry = self.optional_length(node, "ry", Axis::Y);
        // A single radius applies to both axes.
        let (rx, ry) = match (rx, ry) {
            (Some(rx), Some(ry)) => (rx, ry),
            (Some(r), None) | (None, Some(r)) => (r, r),
            (None, None) => (0.0, 0.0),
        };
        Shape::Rect {
            x: self.length(node, "x", Axis::X),
            y: self.length(node, "y", Axis::Y),
            width: self.length(node, "width", Axis::X),
            height: self.length(node, "height", Axis::Y),
            rx: rx.max(0.0),
            ry: ry.max(0.0),
        }
    }

    fn length(&self, node: Node<'_, '_>, name: &str, axis: Axis) -> f32 {
        self.optional_length(node, name, axis).unwrap_or(0.0)
    }

    fn optional_length(&self, node: Node<'_, '_>, name: &str, axis: Axis) -> Option<f32> {
        let base = match axis {
            Axis::X => self.view_box.width,
            Axis::Y => self.view_box.height,
            Axis::Diagonal => {
                let (w, h) = (self.view_box.width, self.view_box.height);
                ((w * w + h * h) / 2.0).sqrt()
            }
        };
        node.attribute(name)
            .and_then(SvgLength::parse)
            .map(|l| l.to_px(base))
    }

    // ==================== Reference Resolution ====================

    /// Resolve every `use` target, then drop the targets whose expansion would reach the
    /// referencing element again. Runs in document order so the first `use` of a cycle loses
    /// its target and the rest stay renderable.
    fn resolve_references(&mut self) {
        let uses: Vec<NodeId> = (0..self.nodes.len())
            .map(NodeId)
            .filter(|id| matches!(self.nodes[id.0].kind, NodeKind::Use { .. }))
            .collect();

        for &use_id in &uses {
            let target = match &self.nodes[use_id.0].kind {
                NodeKind::Use { href, .. } => match self.ids.get(href) {
                    Some(&target) => Some(target),
                    None => {
                        self.warnings.push(GeometryWarning::UnresolvedReference {
                            href: href.clone(),
                        });
                        None
                    }
                },
                _ => None,
            };
            if let NodeKind::Use { target: slot, .. } = &mut self.nodes[use_id.0].kind {
                *slot = target;
            }
        }

        let cyclic = self.cyclic_nodes();
        for &use_id in uses.iter().filter(|id| cyclic[id.0]) {
            let NodeKind::Use {
                href,
                target: Some(target),
                ..
            } = &self.nodes[use_id.0].kind
            else {
                continue;
            };

            if self.reaches(*target, use_id) {
                let href = href.clone();
                self.warnings.push(GeometryWarning::CyclicReference { href });
                if let NodeKind::Use { target, .. } = &mut self.nodes[use_id.0].kind {
                    *target = None;
                }
            }
        }
    }

    /// Marks every node that sits on a reference cycle (Tarjan's SCC, iterative).
    fn cyclic_nodes(&self) -> Vec<bool> {
        const UNVISITED: usize = usize::MAX;

        let count = self.nodes.len();
        let mut index = vec![UNVISITED; count];
        let mut low = vec![0; count];
        let mut on_stack = vec![false; count];
        let mut cyclic = vec![false; count];
        let mut scc_stack: Vec<NodeId> = Vec::new();
        let mut next_index = 0;

        for start in (0..count).map(NodeId) {
            if index[start.0] != UNVISITED {
                continue;
            }
            index[start.0] = next_index;
            low[start.0] = next_index;
            next_index += 1;
            scc_stack.push(start);
            on_stack[start.0] = true;

            // (node, position of the next successor to examine)
            let mut frames = vec![(start, 0usize)];
            while let Some(frame) = frames.last_mut() {
                let (v, edge) = *frame;
                if let Some(&w) = self.successors(v).get(edge) {
                    frame.1 += 1;
                    if index[w.0] == UNVISITED {
                        index[w.0] = next_index;
                        low[w.0] = next_index;
                        next_index += 1;
                        scc_stack.push(w);
                        on_stack[w.0] = true;
                        frames.push((w, 0));
                    } else if on_stack[w.0] {
                        low[v.0] = low[v.0].min(index[w.0]);
                    }
                    continue;
                }

                frames.pop();
                if let Some(&(parent, _)) = frames.last() {
                    low[parent.0] = low[parent.0].min(low[v.0]);
                }
                if low[v.0] == index[v.0] {
                    let mut members = Vec::new();
                    while let Some(w) = scc_stack.pop() {
                        on_stack[w.0] = false;
                        members.push(w);
                        if w == v {
                            break;
                        }
                    }
                    if members.len() > 1 || self.successors(v).contains(&v) {
                        for w in members {
                            cyclic[w.0] = true;
                        }
                    }
                }
            }
        }
        cyclic
    }

    /// Drop the targets of `use` elements whose expansion would nest more than
    /// [`MAX_EXPANSION_DEPTH`] levels, so rendering depth stays bounded.
    /// Expects an acyclic graph.
    fn limit_expansion_depth(&mut self) {
        let mut depth: Vec<Option<usize>> = vec![None; self.nodes.len()];

        for start in (0..self.nodes.len()).map(NodeId) {
            let mut pending = vec![(start, false)];
            while let Some((id, expanded)) = pending.pop() {
                if depth[id.0].is_some() {
                    continue;
                }
                if !expanded {
                    pending.push((id, true));
                    pending.extend(
                        self.successors(id)
                            .iter()
                            .filter(|s| depth[s.0].is_none())
                            .map(|&s| (s, false)),
                    );
                    continue;
                }

                let deepest = self
                    .successors(id)
                    .iter()
                    .filter_map(|s| depth[s.0])
                    .max()
                    .unwrap_or(0);
                let mut own = deepest + 1;
                if own > MAX_EXPANSION_DEPTH {
                    if let NodeKind::Use { href, target, .. } = &mut self.nodes[id.0].kind {
                        *target = None;
                        self.warnings.push(GeometryWarning::ReferenceTooDeep {
                            href: href.clone(),
                            limit: MAX_EXPANSION_DEPTH,
                        });
                        own = 1;
                    }
                }
                depth[id.0] = Some(own);
            }
        }
    }

    /// Nodes visited when `id` is instantiated: group children or a resolved `use` target.
    fn successors(&self, id: NodeId) -> &[NodeId] {
        match &self.nodes[id.0].kind {
            NodeKind::Group { children, .. } => children,
            NodeKind::Use {
                target: Some(target),
                ..
            } => std::slice::from_ref(target),
            _ => &[],
        }
    }

    /// Whether instantiating `from` would visit `needle`.
    fn reaches(&self, from: NodeId, needle: NodeId) -> bool {
        let mut stack = vec![from];
        let mut seen = HashSet::new();
        while let Some(current) = stack.pop() {
            if current == needle {
                return true;
            }
            if !seen.insert(current) {
                continue;
            }
            stack.extend(self.successors(current).iter().copied());
        }
        false
    }
}

#[derive(Clone, Copy)]
enum Axis {
    X,
    Y,
    Diagonal,
}

fn first_coordinate(value: Option<&str>) -> f32 {
    value
        .and_then(|v| v.split(|c: char| c.is_whitespace() || c == ',').find(|s| !s.is_empty()))
        .and_then(SvgLength::parse)
        .map(|l| l.to_px(0.0))
        .unwrap_or(0.0)
}

/// Character data of a `text` element and its `tspan` descendants, whitespace collapsed.
fn text_content(node: Node<'_, '_>) -> String {
    let mut raw = String::new();
    let mut pending: Vec<Node<'_, '_>> = node.children().rev().collect();
    while let Some(child) = pending.pop() {
        if child.is_text() {
            raw.push_str(child.text().unwrap_or(""));
            raw.push(' ');
        } else if child.is_element() && child.tag_name().name() == "tspan" {
            pending.extend(child.children().rev());
        }
    }
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
