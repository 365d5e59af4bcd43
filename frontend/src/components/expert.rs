use yew::prelude::*;

use super::Bot;
use crate::launcher::use_launched;
use crate::props::WidgetProps;

const DIVIDER_COLOR: &str = "#3B81F6";

/// Two chat panes side by side, rendered once the page element is visible.
#[function_component]
pub fn ExpertPage(props: &WidgetProps) -> Html {
    let root = use_node_ref();
    let launched = use_launched(root.clone());

    html! {
        <div ref={root} class="flowise-expert" style="display: flex; height: 100vh; width: 100%;">
            if launched {
                <div style="flex: 1; background-color: #ffffff;">
                    <Bot widget={props.clone()} full_page=true />
                </div>
                <div style={format!("width: 5px; height: 100vh; position: relative; background-color: {DIVIDER_COLOR};")} />
                <div style="flex: 1; background-color: #ffffff;">
                    <Bot widget={props.clone()} full_page=true />
                </div>
            }
        </div>
    }
}
