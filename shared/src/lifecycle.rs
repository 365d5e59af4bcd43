use miette::Diagnostic;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::{BotConfig, ConfigError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    Bubble,
    Full,
    ExpertPage,
}

impl WidgetKind {
    pub fn tag_name(&self) -> &'static str {
        match self {
            WidgetKind::Bubble => "flowise-chatbot",
            WidgetKind::Full => "flowise-fullchatbot",
            WidgetKind::ExpertPage => "flowise-expertpage",
        }
    }
}

#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("{target} element not found.")]
    ElementNotFound { target: String },
    #[error(transparent)]
    InvalidConfig(#[from] ConfigError),
    #[error("host failed: {0}")]
    Host(String),
}

/// The page a widget lives in.
pub trait Host {
    type Element: Clone + PartialEq;
    type Mounted;
    type Props: AsRef<BotConfig>;

    fn find_by_id(&self, id: &str) -> Option<Self::Element>;

    fn find_by_tag(&self, tag: &str) -> Option<Self::Element>;

    /// Creates an element and appends it to the page body.
    fn create(&self, tag: &str) -> Result<Self::Element, LifecycleError>;

    fn mount(
        &self,
        element: Self::Element,
        kind: WidgetKind,
        props: Self::Props,
    ) -> Result<Self::Mounted, LifecycleError>;

    /// Tears down the rendered widget and hands back the element it lived in.
    fn unmount(&self, mounted: Self::Mounted) -> Self::Element;

    /// Detaches an element from the page.
    fn remove(&self, element: &Self::Element);
}

#[derive(Debug)]
pub struct WidgetHandle<M> {
    kind: WidgetKind,
    mounted: M,
}

impl<M> WidgetHandle<M> {
    pub fn kind(&self) -> WidgetKind {
        self.kind
    }

    pub fn mounted(&self) -> &M {
        &self.mounted
    }
}

fn locate<H: Host>(
    host: &H,
    kind: WidgetKind,
    id: Option<&str>,
) -> Result<H::Element, LifecycleError> {
    let tag = kind.tag_name();
    if kind == WidgetKind::Bubble {
        return host.create(tag);
    }

    let found = match id {
        Some(id) => host.find_by_id(id),
        None => host.find_by_tag(tag),
    };

    found.ok_or_else(|| {
        let target = match id {
            Some(id) => format!("#{id}"),
            None => format!("<{tag}>"),
        };
        LifecycleError::ElementNotFound { target }
    })
}

fn mount_into<H: Host>(
    host: &H,
    element: H::Element,
    kind: WidgetKind,
    props: H::Props,
) -> Result<WidgetHandle<H::Mounted>, LifecycleError> {
    match host.mount(element.clone(), kind, props) {
        Ok(mounted) => {
            info!(tag = kind.tag_name(), "widget mounted");
            Ok(WidgetHandle { kind, mounted })
        }
        Err(err) => {
            // a bubble element only exists for this widget
            if kind == WidgetKind::Bubble {
                host.remove(&element);
            }
            Err(err)
        }
    }
}

/// Mounts one widget and hands back its handle. `id` is ignored for the
/// bubble, which always gets a fresh element.
pub fn mount_widget<H: Host>(
    host: &H,
    kind: WidgetKind,
    props: H::Props,
    id: Option<&str>,
) -> Result<WidgetHandle<H::Mounted>, LifecycleError> {
    props.as_ref().validate()?;
    let element = locate(host, kind, id)?;
    mount_into(host, element, kind, props)
}

/// Tears the widget down and removes its element from the page.
pub fn unmount_widget<H: Host>(host: &H, handle: WidgetHandle<H::Mounted>) {
    debug!(tag = handle.kind.tag_name(), "widget unmounted");
    let element = host.unmount(handle.mounted);
    host.remove(&element);
}

/// Keeps at most one widget mounted on a host. Every `init*` replaces the
/// previous widget and removes its element; a failed lookup leaves it in place.
pub struct Lifecycle<H: Host> {
    host: H,
    current: Option<WidgetHandle<H::Mounted>>,
}

impl<H: Host> Lifecycle<H> {
    pub fn new(host: H) -> Self {
        Self {
            host,
            current: None,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn current(&self) -> Option<&WidgetHandle<H::Mounted>> {
        self.current.as_ref()
    }

    pub fn is_mounted(&self) -> bool {
        self.current.is_some()
    }

    /// Floating bubble on a freshly created element.
    pub fn init(&mut self, props: H::Props) -> Result<(), LifecycleError> {
        self.activate(WidgetKind::Bubble, props, None)
    }

    pub fn init_full(&mut self, props: H::Props, id: Option<&str>) -> Result<(), LifecycleError> {
        self.activate(WidgetKind::Full, props, id)
    }

    pub fn init_expert_page(
        &mut self,
        props: H::Props,
        id: Option<&str>,
    ) -> Result<(), LifecycleError> {
        self.activate(WidgetKind::ExpertPage, props, id)
    }

    pub fn destroy(&mut self) {
        if let Some(handle) = self.current.take() {
            unmount_widget(&self.host, handle);
        }
    }

    fn activate(
        &mut self,
        kind: WidgetKind,
        props: H::Props,
        id: Option<&str>,
    ) -> Result<(), LifecycleError> {
        props.as_ref().validate()?;
        let element = locate(&self.host, kind, id)?;

        if let Some(previous) = self.current.take() {
            debug!(tag = previous.kind.tag_name(), "replacing widget");
            let old = self.host.unmount(previous.mounted);
            // initialising into the tracked element again renders over it
            if old != element {
                self.host.remove(&old);
            }
        }

        self.current = Some(mount_into(&self.host, element, kind, props)?);
        Ok(())
    }
}

impl<H: Host> Drop for Lifecycle<H> {
    fn drop(&mut self) {
        self.destroy();
    }
}
