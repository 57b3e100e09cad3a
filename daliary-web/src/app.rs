//! Root component for the 2048 mini-game screen.
//!
//! The engine owns every rule; this component only feeds it input events,
//! applies its save decisions, and relays its submissions to the backend.

use daliary_game::board::Direction;
use daliary_game::reward::{RewardDecision, ScoreRecord, SubmitAck};
use daliary_game::{DayKey, GameSession, MOVE_LOCK_MS};
use gloo::timers::callback::Timeout;
use wasm_bindgen_futures::spawn_local;
use web_sys::{KeyboardEvent, TouchEvent};
use yew::prelude::*;

use crate::backend;
use crate::components::board::BoardView;
use crate::components::hud::Hud;
use crate::game::{create_web_engine, entropy_seed};
use crate::input::{self, SwipeTracker};

#[function_component(App)]
pub fn app() -> Html {
    let session = use_state(|| None::<GameSession>);
    let best = use_state(|| None::<ScoreRecord>);
    let won = use_state(|| false);
    let message = use_state(|| None::<String>);
    // The lock only gates input, never rendering, so a plain ref suffices.
    let locked = use_mut_ref(|| false);
    let swipe = use_mut_ref(SwipeTracker::default);

    // Boot: restore today's board and seed the best-score display.
    {
        let session = session.clone();
        let best = best.clone();
        use_effect_with((), move |_| {
            let engine = create_web_engine();
            let started = engine.start_session(DayKey::today(), entropy_seed());
            session.set(Some(started));
            spawn_local(async move {
                match backend::best_score().await {
                    Ok(record) => best.set(record),
                    Err(err) => log::warn!("best-score fetch failed: {err}"),
                }
            });
            || {}
        });
    }

    let on_ack = {
        let best = best.clone();
        Callback::from(move |_: SubmitAck| {
            let best = best.clone();
            spawn_local(async move {
                match backend::best_score().await {
                    Ok(record) => best.set(record),
                    Err(err) => log::warn!("best-score refresh failed: {err}"),
                }
            });
        })
    };

    let on_move = {
        let session = session.clone();
        let best = best.clone();
        let won = won.clone();
        let locked = locked.clone();
        let on_ack = on_ack.clone();
        Callback::from(move |dir: Direction| {
            if *locked.borrow() {
                return;
            }
            let Some(mut sess) = (*session).clone() else {
                return;
            };
            sess.set_last_reward_day(
                (*best)
                    .as_ref()
                    .and_then(|record| record.last_reward_day.clone()),
            );
            let report = sess.handle_move(dir);
            if !report.moved {
                return;
            }
            let engine = create_web_engine();
            if let Err(err) = engine.apply_save(&report.save) {
                log::warn!("save failed: {err}");
            }
            for submission in report.submissions {
                backend::submit_in_background(submission, on_ack.clone());
            }
            if report.reward == RewardDecision::GrantReward {
                won.set(true);
            }
            *locked.borrow_mut() = true;
            let unlock = locked.clone();
            Timeout::new(MOVE_LOCK_MS, move || {
                *unlock.borrow_mut() = false;
            })
            .forget();
            session.set(Some(sess));
        })
    };

    let onkeydown = {
        let on_move = on_move.clone();
        Callback::from(move |event: KeyboardEvent| {
            if let Some(dir) = input::direction_for_key(&event.key()) {
                event.prevent_default();
                on_move.emit(dir);
            }
        })
    };

    let ontouchstart = {
        let swipe = swipe.clone();
        Callback::from(move |event: TouchEvent| {
            if let Some(touch) = event.touches().get(0) {
                swipe
                    .borrow_mut()
                    .begin(f64::from(touch.client_x()), f64::from(touch.client_y()));
            }
        })
    };

    let ontouchend = {
        let swipe = swipe.clone();
        let on_move = on_move.clone();
        Callback::from(move |event: TouchEvent| {
            if let Some(touch) = event.changed_touches().get(0) {
                let dir = swipe
                    .borrow_mut()
                    .finish(f64::from(touch.client_x()), f64::from(touch.client_y()));
                if let Some(dir) = dir {
                    on_move.emit(dir);
                }
            }
        })
    };

    let on_hint = {
        let session = session.clone();
        let message = message.clone();
        Callback::from(move |()| {
            let Some(mut sess) = (*session).clone() else {
                return;
            };
            match sess.use_hint() {
                Ok(action) => {
                    let engine = create_web_engine();
                    if let Err(err) = engine.apply_save(&action) {
                        log::warn!("save failed: {err}");
                    }
                    message.set(None);
                    session.set(Some(sess));
                }
                Err(err) => message.set(Some(err.to_string())),
            }
        })
    };

    let on_restart = {
        let session = session.clone();
        let won = won.clone();
        let message = message.clone();
        Callback::from(move |()| {
            let Some(mut sess) = (*session).clone() else {
                return;
            };
            let action = sess.restart();
            let engine = create_web_engine();
            if let Err(err) = engine.apply_save(&action) {
                log::warn!("save failed: {err}");
            }
            won.set(false);
            message.set(None);
            session.set(Some(sess));
        })
    };

    (*session).clone().map_or_else(Html::default, |sess| {
        let snapshot = sess.state().clone();
        let best_display = (*best)
            .as_ref()
            .map_or(0, |record| record.high_score)
            .max(snapshot.score);
        html! {
            <div class="game2048" tabindex="0" {onkeydown} {ontouchstart} {ontouchend}>
                <Hud
                    score={snapshot.score}
                    best={best_display}
                    hint_used={snapshot.hint_used}
                    message={(*message).clone()}
                    on_hint={on_hint}
                    on_restart={on_restart.clone()}
                />
                <BoardView state={snapshot} />
                if *won {
                    <div class="overlay win" role="alertdialog">
                        <h2>{ "2048!" }</h2>
                        <p>{ "Today's challenge is complete. Your points are on the way." }</p>
                    </div>
                }
                if sess.is_game_over() {
                    <div class="overlay lost" role="alertdialog">
                        <h2>{ "No more moves" }</h2>
                        <button onclick={
                            let cb = on_restart;
                            Callback::from(move |_: MouseEvent| cb.emit(()))
                        }>{ "Play again" }</button>
                    </div>
                }
            </div>
        }
    })
}
