use frontend::{AbortSlot, Chatbot, JsRequestHook, PageProps};
use js_sys::Function;
use shared::{ClientError, Method, OutgoingBody, OutgoingRequest, RequestHook};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn hook(body: &str) -> JsRequestHook {
    JsRequestHook::new(Function::new_with_args("r", body))
}

fn prediction() -> OutgoingRequest {
    let mut request = OutgoingRequest {
        method: Method::Post,
        url: "http://localhost:3000/api/v1/prediction/f1".to_owned(),
        headers: Default::default(),
        body: OutgoingBody::Json(r#"{"question":"hi"}"#.to_owned()),
    };
    request
        .headers
        .insert("Content-Type".to_owned(), "application/json".to_owned());
    request
}

fn js_object(source: &str) -> JsValue {
    Function::new_no_args(&format!("return {source};"))
        .call0(&JsValue::NULL)
        .unwrap()
}

fn document() -> web_sys::Document {
    web_sys::window().unwrap().document().unwrap()
}

#[wasm_bindgen_test]
async fn hook_can_rewrite_url_and_headers() {
    let mut request = prediction();

    hook("r.url = r.url + '?trace=1'; r.headers['X-Trace'] = 'abc';")
        .before_send(&mut request)
        .await
        .unwrap();

    assert_eq!(
        request.url,
        "http://localhost:3000/api/v1/prediction/f1?trace=1"
    );
    assert_eq!(request.header("x-trace"), Some("abc"));
    assert_eq!(request.header("content-type"), Some("application/json"));
}

#[wasm_bindgen_test]
async fn hook_can_hand_back_a_headers_instance() {
    let mut request = prediction();

    hook("r.headers = new Headers(r.headers); r.headers.append('Authorization', 'Bearer k');")
        .before_send(&mut request)
        .await
        .unwrap();

    assert_eq!(request.header("authorization"), Some("Bearer k"));
    assert_eq!(request.header("content-type"), Some("application/json"));
}

#[wasm_bindgen_test]
async fn hook_without_header_bag_keeps_headers() {
    let mut request = prediction();

    hook("delete r.headers;")
        .before_send(&mut request)
        .await
        .unwrap();

    assert_eq!(request.header("content-type"), Some("application/json"));
}

#[wasm_bindgen_test]
async fn async_hook_is_awaited() {
    let mut request = prediction();

    hook("return new Promise(done => setTimeout(() => { r.url = 'http://other.example/x'; done(); }, 0));")
        .before_send(&mut request)
        .await
        .unwrap();

    assert_eq!(request.url, "http://other.example/x");
}

#[wasm_bindgen_test]
async fn throwing_hook_aborts() {
    let mut request = prediction();

    let err = hook("throw new Error('not signed in');")
        .before_send(&mut request)
        .await
        .unwrap_err();

    assert_eq!(err.reason, "not signed in");
}

#[wasm_bindgen_test]
async fn rejecting_hook_aborts() {
    let mut request = prediction();

    let err = hook("return Promise.reject(new Error('denied'));")
        .before_send(&mut request)
        .await
        .unwrap_err();

    assert_eq!(err.reason, "denied");
}

#[wasm_bindgen_test]
async fn signal_set_by_hook_reaches_the_slot() {
    let abort = AbortSlot::default();
    let mut request = prediction();

    hook("const ctrl = new AbortController(); ctrl.abort(); r.signal = ctrl.signal;")
        .with_abort(abort.clone())
        .before_send(&mut request)
        .await
        .unwrap();

    let signal = abort.take().expect("signal handed over");
    assert!(signal.aborted());
    assert!(abort.take().is_none());
}

#[wasm_bindgen_test]
async fn aborted_signal_cancels_the_request() {
    let props = js_object(
        "{ chatflowid: 'f1', apiHost: 'http://localhost:9', \
           onRequest: r => { const c = new AbortController(); c.abort(); r.signal = c.signal; } }",
    );
    let page = PageProps::from_js(&props).unwrap();

    let err = page.widget.api().get_chatbot_config("f1").await.unwrap_err();

    assert!(matches!(err, ClientError::Network(_)), "{err:?}");
}

#[wasm_bindgen_test]
async fn hook_abort_never_dispatches() {
    let props = js_object("{ chatflowid: 'f1', onRequest: () => { throw new Error('blocked'); } }");
    let page = PageProps::from_js(&props).unwrap();

    let err = page.widget.api().get_chatbot_config("f1").await.unwrap_err();

    assert!(matches!(err, ClientError::Aborted(ref e) if e.reason == "blocked"));
}

#[wasm_bindgen_test]
fn page_props_pick_up_functions() {
    let props = js_object(
        "{ chatflowid: 'f1', apiHost: 'https://flowise.example.com', id: 'root', \
           onRequest: r => {}, observersConfig: { observeLoading: l => {} } }",
    );

    let page = PageProps::from_js(&props).unwrap();

    assert_eq!(page.id.as_deref(), Some("root"));
    assert_eq!(page.widget.config.chatflowid, "f1");
    assert_eq!(
        page.widget.config.api_host.as_deref(),
        Some("https://flowise.example.com")
    );
    assert!(page.widget.hook.is_some());
    assert!(page.widget.observers.loading.is_some());
    assert!(page.widget.observers.messages.is_none());
}

#[wasm_bindgen_test]
fn page_props_must_be_an_object() {
    assert!(PageProps::from_js(&JsValue::from_str("f1")).is_err());
    assert!(PageProps::from_js(&JsValue::UNDEFINED).is_err());
}

#[wasm_bindgen_test]
fn second_init_leaves_one_bubble() {
    let mut bot = Chatbot::new().unwrap();

    bot.init(js_object("{ chatflowid: 'f1' }")).unwrap();
    bot.init(js_object("{ chatflowid: 'f2' }")).unwrap();

    let bubbles = document().query_selector_all("flowise-chatbot").unwrap();
    assert_eq!(bubbles.length(), 1);

    bot.destroy();
    let bubbles = document().query_selector_all("flowise-chatbot").unwrap();
    assert_eq!(bubbles.length(), 0);
    assert!(!bot.is_mounted());
}

#[wasm_bindgen_test]
fn destroy_removes_full_page_element() {
    let root = document().create_element("div").unwrap();
    root.set_id("chat-root");
    document().body().unwrap().append_child(&root).unwrap();
    let mut bot = Chatbot::new().unwrap();

    bot.init_full(js_object("{ chatflowid: 'f1', id: 'chat-root' }"))
        .unwrap();
    assert!(bot.is_mounted());

    bot.destroy();
    assert!(document().get_element_by_id("chat-root").is_none());
}

#[wasm_bindgen_test]
fn missing_full_page_element_is_reported() {
    let mut bot = Chatbot::new().unwrap();

    let err = bot
        .init_full(js_object("{ chatflowid: 'f1', id: 'nowhere' }"))
        .unwrap_err();

    let message = err.unchecked_into::<js_sys::Error>().message();
    assert_eq!(String::from(message), "#nowhere element not found.");
}
