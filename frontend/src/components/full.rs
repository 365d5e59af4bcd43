use yew::prelude::*;

use super::Bot;
use crate::launcher::use_launched;
use crate::props::WidgetProps;

#[function_component]
pub fn Full(props: &WidgetProps) -> Html {
    let root = use_node_ref();
    let launched = use_launched(root.clone());

    html! {
        <div ref={root} class="flowise-full" style="display: flex; height: 100vh; width: 100%;">
            if launched {
                <Bot widget={props.clone()} full_page=true />
            }
        </div>
    }
}
