use yew::prelude::*;

use super::Bot;
use crate::props::WidgetProps;

const DEFAULT_BUTTON_COLOR: &str = "#3B81F6";
const DEFAULT_ICON_COLOR: &str = "white";

#[function_component]
pub fn Bubble(props: &WidgetProps) -> Html {
    let open = use_state(|| false);

    let onclick = {
        let open = open.clone();
        move |_: MouseEvent| open.set(!*open)
    };

    let button = props.config.button();
    let background = button
        .and_then(|b| b.background_color.clone())
        .unwrap_or_else(|| DEFAULT_BUTTON_COLOR.to_owned());
    let icon = button
        .and_then(|b| b.icon_color.clone())
        .unwrap_or_else(|| DEFAULT_ICON_COLOR.to_owned());

    html! {
        <>
            <button
                class="flowise-bubble__button"
                style={format!("background-color: {background}; color: {icon};")}
                {onclick}
            >
                { if *open { "×" } else { "💬" } }
            </button>
            if *open {
                <div class="flowise-bubble__window">
                    <Bot widget={props.clone()} />
                </div>
            }
        </>
    }
}
