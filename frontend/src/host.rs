use shared::{Host, LifecycleError, WidgetKind};
use wasm_bindgen::JsValue;
use web_sys::{Document, Element};
use yew::AppHandle;

use crate::components::{Bubble, ExpertPage, Full};
use crate::props::WidgetProps;
use crate::transport::js_message;

fn host_error(err: JsValue) -> LifecycleError {
    LifecycleError::Host(js_message(&err))
}

enum App {
    Bubble(AppHandle<Bubble>),
    Full(AppHandle<Full>),
    ExpertPage(AppHandle<ExpertPage>),
}

pub struct WebMount {
    element: Element,
    app: App,
}

impl WebMount {
    pub fn element(&self) -> &Element {
        &self.element
    }
}

/// The browser document the widget renders into.
pub struct WebHost {
    document: Document,
}

impl WebHost {
    pub fn new() -> Result<Self, LifecycleError> {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| LifecycleError::Host("no document available".to_owned()))?;
        Ok(Self { document })
    }
}

impl Host for WebHost {
    type Element = Element;
    type Mounted = WebMount;
    type Props = WidgetProps;

    fn find_by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn find_by_tag(&self, tag: &str) -> Option<Element> {
        self.document.query_selector(tag).ok().flatten()
    }

    fn create(&self, tag: &str) -> Result<Element, LifecycleError> {
        let element = self.document.create_element(tag).map_err(host_error)?;
        let body = self
            .document
            .body()
            .ok_or_else(|| LifecycleError::Host("document has no body".to_owned()))?;
        body.append_child(&element).map_err(host_error)?;
        Ok(element)
    }

    fn mount(
        &self,
        element: Element,
        kind: WidgetKind,
        props: WidgetProps,
    ) -> Result<WebMount, LifecycleError> {
        let root = element.clone();
        let app = match kind {
            WidgetKind::Bubble => {
                App::Bubble(yew::Renderer::<Bubble>::with_root_and_props(root, props).render())
            }
            WidgetKind::Full => {
                App::Full(yew::Renderer::<Full>::with_root_and_props(root, props).render())
            }
            WidgetKind::ExpertPage => App::ExpertPage(
                yew::Renderer::<ExpertPage>::with_root_and_props(root, props).render(),
            ),
        };

        Ok(WebMount { element, app })
    }

    fn unmount(&self, mounted: WebMount) -> Element {
        let WebMount { element, app } = mounted;
        match app {
            App::Bubble(handle) => handle.destroy(),
            App::Full(handle) => handle.destroy(),
            App::ExpertPage(handle) => handle.destroy(),
        }
        element
    }

    fn remove(&self, element: &Element) {
        element.remove();
    }
}
