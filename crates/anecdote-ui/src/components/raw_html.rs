//! Container whose children come from trusted markup (popup body, rendered update log).

use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub(crate) struct RawHtmlProps {
    pub(crate) markup: AttrValue,
    #[prop_or_default]
    pub(crate) id: Option<AttrValue>,
    #[prop_or_default]
    pub(crate) class: Classes,
}

#[function_component(RawHtml)]
pub(crate) fn raw_html(props: &RawHtmlProps) -> Html {
    let host = use_node_ref();
    {
        let host = host.clone();
        use_effect_with_deps(
            move |markup: &AttrValue| {
                if let Some(element) = host.cast::<web_sys::Element>() {
                    element.set_inner_html(markup);
                }
                || ()
            },
            props.markup.clone(),
        );
    }
    html! { <div id={props.id.clone()} class={props.class.clone()} ref={host}></div> }
}
