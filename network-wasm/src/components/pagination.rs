use network_client::PaginationControl;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct PaginationProps {
    pub current: u32,
    pub total: u32,
    pub on_change: Callback<u32>,
}

/// Previous/next controls; renders nothing for a single page.
#[function_component(Pagination)]
pub fn pagination(props: &PaginationProps) -> Html {
    let Some(control) = PaginationControl::new(props.current, props.total) else {
        return html! {};
    };

    let item = |target: Option<u32>, label: &'static str| {
        let class = classes!("page-item", target.is_none().then_some("disabled"));
        let on_change = props.on_change.clone();
        let onclick = Callback::from(move |_: MouseEvent| {
            if let Some(page) = target {
                on_change.emit(page);
            }
        });
        html! {
            <li {class}>
                <button class="page-link" disabled={target.is_none()} {onclick}>{ label }</button>
            </li>
        }
    };

    html! {
        <nav aria-label="Page navigation">
            <ul class="pagination justify-content-center">
                { item(control.previous(), "Previous") }
                <li class="page-item active">
                    <span class="page-link">{ control.label() }</span>
                </li>
                { item(control.next(), "Next") }
            </ul>
        </nav>
    }
}
