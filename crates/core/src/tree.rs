// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Window tree returned by `GET_TREE`.
//!
//! The compositor does not tag nodes: a node is an application window when it
//! carries a `pid`, and a container (root, output, workspace, split) otherwise.
//! That decision is made once, while deserializing, and the rest of the crate
//! only ever sees [`Node::Application`] or [`Node::Container`].

use std::collections::HashMap;

use serde::Deserialize;

use crate::Pid;

/// A node of the compositor's window tree.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawNode")]
pub enum Node {
    Application(AppNode),
    Container(ContainerNode),
}

/// A leaf node backed by a client process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppNode {
    pub id: i64,
    pub pid: Pid,
    /// Wayland `app_id`, or the X11 window class for Xwayland clients.
    pub app_id: String,
    pub name: Option<String>,
    pub visible: bool,
    pub inhibit_idle: bool,
    pub focused: bool,
    pub fullscreen_mode: u8,
}

impl AppNode {
    /// Whether this window counts as on-screen. Idle inhibitors keep an
    /// otherwise hidden window awake (e.g. a video playing in the background).
    pub fn is_active(&self) -> bool {
        self.visible || self.inhibit_idle
    }
}

/// Any non-application node: root, output, workspace or split container.
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerNode {
    pub id: i64,
    pub node_type: String,
    pub name: Option<String>,
    pub focused: bool,
    pub nodes: Vec<Node>,
    pub floating_nodes: Vec<Node>,
}

impl ContainerNode {
    pub fn is_workspace(&self) -> bool {
        self.node_type == "workspace"
    }

    /// The hidden workspace sway keeps scratchpad windows on.
    pub fn is_scratchpad(&self) -> bool {
        self.is_workspace() && self.name.as_deref() == Some("__i3_scratch")
    }
}

impl Node {
    pub fn id(&self) -> i64 {
        match self {
            Node::Application(app) => app.id,
            Node::Container(con) => con.id,
        }
    }

    /// All application windows below (and including) this node.
    ///
    /// Floating children are visited before tiled ones at every level.
    pub fn applications(&self) -> Vec<&AppNode> {
        let mut apps = Vec::new();
        self.collect_applications(&mut apps);
        apps
    }

    fn collect_applications<'a>(&'a self, out: &mut Vec<&'a AppNode>) {
        match self {
            Node::Application(app) => out.push(app),
            Node::Container(con) => {
                for child in con.floating_nodes.iter().chain(con.nodes.iter()) {
                    child.collect_applications(out);
                }
            }
        }
    }

    /// The focused application window, if any.
    pub fn focused_application(&self) -> Option<&AppNode> {
        self.applications().into_iter().find(|app| app.focused)
    }
}

/// Visibility of one client process, derived from all of its windows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowState {
    pub pid: Pid,
    pub app_id: String,
    pub visible: bool,
}

/// Flatten a window tree into one [`WindowState`] per distinct pid.
///
/// A process may own several windows; it is reported visible if any of them
/// is active. Order follows the first window seen for each pid.
pub fn window_states(root: &Node) -> Vec<WindowState> {
    let mut states: Vec<WindowState> = Vec::new();
    let mut index: HashMap<Pid, usize> = HashMap::new();

    for app in root.applications() {
        let visible = app.is_active();
        match index.get(&app.pid) {
            Some(&i) => {
                if visible && !states[i].visible {
                    states[i] = WindowState { pid: app.pid, app_id: app.app_id.clone(), visible };
                }
            }
            None => {
                index.insert(app.pid, states.len());
                states.push(WindowState { pid: app.pid, app_id: app.app_id.clone(), visible });
            }
        }
    }
    states
}

#[derive(Debug, Default, Deserialize)]
struct RawNode {
    #[serde(default)]
    id: i64,
    #[serde(default, rename = "type")]
    node_type: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    pid: Option<u32>,
    #[serde(default)]
    app_id: Option<String>,
    #[serde(default)]
    window_properties: Option<WindowProperties>,
    #[serde(default)]
    visible: Option<bool>,
    #[serde(default)]
    inhibit_idle: Option<bool>,
    #[serde(default)]
    focused: bool,
    #[serde(default)]
    fullscreen_mode: u8,
    #[serde(default)]
    nodes: Vec<RawNode>,
    #[serde(default)]
    floating_nodes: Vec<RawNode>,
}

#[derive(Debug, Default, Deserialize)]
struct WindowProperties {
    #[serde(default)]
    class: Option<String>,
}

impl From<RawNode> for Node {
    fn from(raw: RawNode) -> Self {
        match raw.pid {
            Some(pid) => {
                let app_id = raw
                    .app_id
                    .or_else(|| raw.window_properties.and_then(|p| p.class))
                    .unwrap_or_default();
                Node::Application(AppNode {
                    id: raw.id,
                    pid: Pid::new(pid),
                    app_id,
                    name: raw.name,
                    visible: raw.visible.unwrap_or(false),
                    inhibit_idle: raw.inhibit_idle.unwrap_or(false),
                    focused: raw.focused,
                    fullscreen_mode: raw.fullscreen_mode,
                })
            }
            None => Node::Container(ContainerNode {
                id: raw.id,
                node_type: raw.node_type,
                name: raw.name,
                focused: raw.focused,
                nodes: raw.nodes.into_iter().map(Node::from).collect(),
                floating_nodes: raw.floating_nodes.into_iter().map(Node::from).collect(),
            }),
        }
    }
}

#[cfg(test)]
#[path = "tree_tests.rs"]
mod tests;
