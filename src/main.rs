//! Delve Extract entry point
//!
//! Native builds run a headless session driven by a scripted autopilot.
//! The browser build is driven from JS through `platform::web::WebSession`.

#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use delve_extract::sim::interaction::find_target;
    use delve_extract::sim::{Damageable, Entity, GameState, TickInput};
    use glam::Vec2;

    /// Horizontal distance considered "arrived"
    const ARRIVE_DISTANCE: f32 = 8.0;
    /// Goal this far above the player makes it climb
    const CLIMB_HEIGHT: f32 = 60.0;

    fn nearest<'a>(from: Vec2, candidates: impl Iterator<Item = &'a Entity>) -> Option<&'a Entity> {
        candidates.min_by(|a, b| {
            a.body
                .center()
                .distance(from)
                .total_cmp(&b.body.center().distance(from))
                .then(a.id.cmp(&b.id))
        })
    }

    /// Pick this frame's input: take loot, heal when low, fight what is in
    /// reach, search chests until extraction opens, then head for the zone.
    pub fn drive(state: &GameState) -> TickInput {
        let mut input = TickInput::default();
        if state.loot_menu_open() {
            input.accept_loot = true;
            return input;
        }

        let player = state.player();
        let body = &player.body;
        let center = body.center();
        let tuning = &state.tuning;
        let actors = state.registry.actors();
        // Held keys only register on their press edge
        let pulse = state.frame % 20 < 10;

        if body.health < body.max_health * 0.4 && state.potions > 0 {
            input.potion = pulse;
        }

        let hostile = nearest(center, actors.iter().filter(|e| e.is_hostile() && !e.body.dead));
        if let Some(h) = hostile {
            let dist = h.body.center().distance(center);
            if dist < tuning.attack_reach + body.size.x {
                input.attack = true;
                input.skill = dist < tuning.warrior_skill_radius;
            }
        }

        if state.zone.is_none() && find_target(player, actors, tuning.search_radius).is_some() {
            input.search = true;
            return input;
        }

        let goal = state.zone.map(|z| z.center()).or_else(|| {
            nearest(center, actors.iter().filter(|e| e.is_searchable())).map(|c| c.body.center())
        });
        match goal {
            Some(goal) => {
                let dx = goal.x - center.x;
                input.left = dx < -ARRIVE_DISTANCE;
                input.right = dx > ARRIVE_DISTANCE;
                let stuck = (input.left || input.right) && body.vel.x.abs() < 0.5;
                input.jump = (goal.y < center.y - CLIMB_HEIGHT || stuck) && pulse;
            }
            None => {
                input.right = (state.frame / 600) % 2 == 0;
                input.left = !input.right;
            }
        }
        input
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::cell::Cell;
    use std::rc::Rc;

    use delve_extract::sim::SessionOutcome;
    use delve_extract::{Ledger, Session, Settings, Tuning};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Delve Extract (headless) starting...");

    let settings = std::env::var("DELVE_SETTINGS")
        .map(|path| Settings::load(&path))
        .unwrap_or_default();
    let tuning = std::env::var("DELVE_TUNING")
        .map(|path| Tuning::load(&path))
        .unwrap_or_default();
    let ledger_path = std::env::var("DELVE_LEDGER").ok();
    let mut ledger = ledger_path
        .as_deref()
        .map(Ledger::load_file)
        .unwrap_or_default();

    let mut session = Session::new(&settings, tuning);
    let ended: Rc<Cell<Option<SessionOutcome>>> = Rc::new(Cell::new(None));
    let sink = ended.clone();
    session.set_on_end(move |outcome| sink.set(Some(outcome)));

    for _ in 0..settings.max_frames {
        let input = autopilot::drive(session.state());
        session.step_with(&input);
        if !session.is_running() {
            break;
        }
        let state = session.state();
        if state.frame % 600 == 0 {
            log::debug!(
                "Frame {}: phase {:?}, loot {}, kills {}",
                state.frame,
                state.phase,
                state.inventory.total_value(),
                state.kills
            );
        }
    }

    match ended.take() {
        Some(outcome) => {
            ledger.record(&outcome);
            println!(
                "{} after {} frames: loot {}, kills {}",
                if outcome.success { "Extracted" } else { "Killed" },
                session.state().frame,
                outcome.loot_value,
                outcome.kills
            );
        }
        None => {
            session.stop();
            println!("Frame limit reached after {} frames", session.state().frame);
        }
    }
    println!(
        "Lifetime: {} currency, {} kills",
        ledger.lifetime_currency, ledger.lifetime_kills
    );

    if let Some(path) = ledger_path {
        if let Err(e) = ledger.save_file(&path) {
            log::warn!("Could not save ledger to {}: {}", path, e);
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::init, this is just to satisfy the compiler
}
