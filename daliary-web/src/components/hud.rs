use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub score: u32,
    pub best: u32,
    pub hint_used: bool,
    #[prop_or_default]
    pub message: Option<String>,
    #[prop_or_default]
    pub on_hint: Callback<()>,
    #[prop_or_default]
    pub on_restart: Callback<()>,
}

/// Score header plus the hint and restart controls.
#[function_component(Hud)]
pub fn hud(p: &Props) -> Html {
    let on_hint = {
        let cb = p.on_hint.clone();
        Callback::from(move |_: MouseEvent| cb.emit(()))
    };
    let on_restart = {
        let cb = p.on_restart.clone();
        Callback::from(move |_: MouseEvent| cb.emit(()))
    };
    html! {
        <header class="hud">
            <div class="scores">
                <div class="score-box">
                    <span class="score-label">{ "Score" }</span>
                    <span class="score-value">{ p.score }</span>
                </div>
                <div class="score-box">
                    <span class="score-label">{ "Best" }</span>
                    <span class="score-value">{ p.best }</span>
                </div>
            </div>
            <div class="controls">
                <button onclick={on_hint} disabled={p.hint_used}>{ "Hint" }</button>
                <button onclick={on_restart}>{ "Restart" }</button>
            </div>
            if let Some(message) = &p.message {
                <p class="notice" role="status">{ message.clone() }</p>
            }
        </header>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use yew::LocalServerRenderer;

    #[test]
    fn hud_shows_scores_and_notice() {
        let props = Props {
            score: 420,
            best: 9000,
            hint_used: true,
            message: Some("no empty cell is available for a hint tile".to_string()),
            on_hint: Callback::noop(),
            on_restart: Callback::noop(),
        };
        let html = block_on(LocalServerRenderer::<Hud>::with_props(props).render());
        assert!(html.contains("420"));
        assert!(html.contains("9000"));
        assert!(html.contains("no empty cell"));
        assert!(html.contains("disabled"));
    }
}
