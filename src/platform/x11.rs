use anyhow::{Context, Result};
use eframe::egui;
use tracing::{debug, info};
use x11rb::connection::Connection;
use x11rb::protocol::shape::SK;
use x11rb::protocol::xfixes::ConnectionExt as XFixesExt;
use x11rb::protocol::xproto::*;
use x11rb::rust_connection::RustConnection;

use super::{ClickThrough, ViewportClickThrough};
use crate::constants::x11;

/// Pre-cached X11 atoms to avoid repeated roundtrips
struct CachedAtoms {
    net_client_list: Atom,
    net_wm_pid: Atom,
    net_wm_state: Atom,
    net_wm_state_above: Atom,
    net_wm_state_skip_taskbar: Atom,
    net_wm_state_skip_pager: Atom,
}

impl CachedAtoms {
    fn new(conn: &RustConnection) -> Result<Self> {
        Ok(Self {
            net_client_list: intern(conn, "_NET_CLIENT_LIST")?,
            net_wm_pid: intern(conn, "_NET_WM_PID")?,
            net_wm_state: intern(conn, "_NET_WM_STATE")?,
            net_wm_state_above: intern(conn, "_NET_WM_STATE_ABOVE")?,
            net_wm_state_skip_taskbar: intern(conn, "_NET_WM_STATE_SKIP_TASKBAR")?,
            net_wm_state_skip_pager: intern(conn, "_NET_WM_STATE_SKIP_PAGER")?,
        })
    }
}

fn intern(conn: &RustConnection, name: &str) -> Result<Atom> {
    Ok(conn
        .intern_atom(false, name.as_bytes())
        .context(format!("Failed to intern {name} atom"))?
        .reply()
        .context(format!("Failed to get reply for {name} atom"))?
        .atom)
}

/// EWMH state hints plus an empty XFixes input region
///
/// Covers window managers that ignore winit's own topmost and pass-through
/// requests, and keeps the overlay out of taskbars and pagers.
pub struct X11ClickThrough {
    conn: RustConnection,
    root: Window,
    atoms: CachedAtoms,
    viewport: ViewportClickThrough,
}

impl X11ClickThrough {
    pub fn connect() -> Result<Self> {
        let (conn, screen_num) = x11rb::connect(None).context("Failed to connect to X11 server")?;
        let root = conn.setup().roots[screen_num].root;
        let atoms = CachedAtoms::new(&conn)?;

        // XFixes requests are rejected until the version is negotiated
        let version = conn
            .xfixes_query_version(5, 0)
            .context("Failed to query XFixes version")?
            .reply()
            .context("XFixes extension not available")?;
        info!(
            screen = screen_num,
            xfixes = %format!("{}.{}", version.major_version, version.minor_version),
            "Connected to X11"
        );

        Ok(Self {
            conn,
            root,
            atoms,
            viewport: ViewportClickThrough,
        })
    }

    /// Our own top-level window, matched by `_NET_WM_PID`
    fn find_own_window(&self) -> Result<Option<Window>> {
        let clients = self
            .conn
            .get_property(false, self.root, self.atoms.net_client_list, AtomEnum::WINDOW, 0, u32::MAX)
            .context("Failed to query _NET_CLIENT_LIST property")?
            .reply()
            .context("Failed to get window list from X11 server")?;
        let Some(windows) = clients.value32() else {
            return Ok(None);
        };

        let own_pid = std::process::id();
        for window in windows {
            let pid = self
                .conn
                .get_property(false, window, self.atoms.net_wm_pid, AtomEnum::CARDINAL, 0, 1)
                .context(format!("Failed to query _NET_WM_PID for window {window}"))?
                .reply()
                .ok()
                .and_then(|prop| prop.value32().and_then(|mut values| values.next()));
            if pid == Some(own_pid) {
                return Ok(Some(window));
            }
        }
        Ok(None)
    }

    /// Ask the window manager to add up to two `_NET_WM_STATE` atoms
    fn add_wm_state(&self, window: Window, first: Atom, second: Atom) -> Result<()> {
        let event = ClientMessageEvent {
            response_type: CLIENT_MESSAGE_EVENT,
            format: 32,
            sequence: 0,
            window,
            type_: self.atoms.net_wm_state,
            data: ClientMessageData::from([
                x11::NET_WM_STATE_ADD,
                first,
                second,
                x11::SOURCE_APPLICATION,
                0,
            ]),
        };

        self.conn
            .send_event(
                false,
                self.root,
                EventMask::SUBSTRUCTURE_NOTIFY | EventMask::SUBSTRUCTURE_REDIRECT,
                &event,
            )
            .context(format!("Failed to send _NET_WM_STATE event for window {window}"))?;
        Ok(())
    }

    /// An empty input shape lets every pointer event fall through
    fn clear_input_shape(&self, window: Window) -> Result<()> {
        let region = self.conn.generate_id().context("Failed to generate XFixes region ID")?;
        self.conn
            .xfixes_create_region(region, &[])
            .context("Failed to create empty XFixes region")?;
        self.conn
            .xfixes_set_window_shape_region(window, SK::INPUT, 0, 0, region)
            .context(format!("Failed to set input shape for window {window}"))?;
        self.conn
            .xfixes_destroy_region(region)
            .context("Failed to destroy XFixes region")?;
        Ok(())
    }
}

impl ClickThrough for X11ClickThrough {
    fn backend(&self) -> &'static str {
        "x11"
    }

    fn apply(&mut self, ctx: &egui::Context) -> Result<bool> {
        self.viewport.apply(ctx)?;

        let Some(window) = self.find_own_window()? else {
            debug!("Overlay window not managed yet");
            return Ok(false);
        };

        self.add_wm_state(window, self.atoms.net_wm_state_above, 0)?;
        self.add_wm_state(
            window,
            self.atoms.net_wm_state_skip_taskbar,
            self.atoms.net_wm_state_skip_pager,
        )?;
        self.clear_input_shape(window)?;
        self.conn
            .flush()
            .context("Failed to flush X11 connection after window setup")?;

        info!(window = window, "Overlay window set click-through and topmost");
        Ok(true)
    }
}
