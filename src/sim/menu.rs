//! Menu and level-select phases
//!
//! Menus are played with the ship: shooting a block, or pressing select while
//! the ship sits in a block's column, activates it.

use glam::Vec2;

use super::behavior::{AdvanceContext, TargetInfo, advance_all};
use super::entity::{Entity, EntityData, MenuAction};
use super::events::GameEvent;
use super::state::{GamePhase, GameState, IdAllocator};
use super::tick::TickInput;
use crate::SimError;
use crate::audio::SoundCue;

const MENU_ROW_Y: f32 = 200.0;
const LEVEL_GRID_COLUMNS: usize = 4;
/// Level-select shows at most this many levels
const LEVEL_GRID_MAX: usize = 8;

/// Levels / Play / Quit
pub fn main_menu(ids: &mut IdAllocator) -> Vec<Entity> {
    [
        (140.0, MenuAction::LevelSelect),
        (320.0, MenuAction::Play),
        (500.0, MenuAction::Quit),
    ]
    .into_iter()
    .map(|(x, action)| Entity::menu_block(ids.next_id(), Vec2::new(x, MENU_ROW_Y), action))
    .collect()
}

/// One block per unlocked level, plus Back
pub fn level_select(ids: &mut IdAllocator, unlocked_level: usize) -> Vec<Entity> {
    let count = (unlocked_level + 1).min(LEVEL_GRID_MAX);
    let mut blocks: Vec<Entity> = (0..count)
        .map(|level| {
            let col = (level % LEVEL_GRID_COLUMNS) as f32;
            let row = (level / LEVEL_GRID_COLUMNS) as f32;
            let pos = Vec2::new(80.0 + col * 160.0, 150.0 + row * 80.0);
            Entity::menu_block(ids.next_id(), pos, MenuAction::StartLevel(level))
        })
        .collect();
    blocks.push(Entity::menu_block(
        ids.next_id(),
        Vec2::new(320.0, 420.0),
        MenuAction::Back,
    ));
    blocks
}

fn block_action(block: &Entity) -> Option<MenuAction> {
    match block.data {
        EntityData::MenuBlock { action } => Some(action),
        _ => None,
    }
}

/// Advance a menu phase by one tick
pub fn step(
    state: &mut GameState,
    input: &TickInput,
    dt: f32,
    events: &mut Vec<GameEvent>,
    sounds: &mut Vec<SoundCue>,
) -> Result<(), SimError> {
    // No bombs on the menu
    let input = TickInput {
        bomb: false,
        ..*input
    };
    let mut targets: [TargetInfo; 0] = [];
    let mut ctx = AdvanceContext::new(
        &input,
        state.player.pos,
        &mut targets,
        &mut state.rng,
        &mut state.ids,
        &state.settings,
    );
    let player = &mut state.player;
    player.variant().behavior().advance(player, dt, &mut ctx);
    advance_all(&mut state.lasers, dt, &mut ctx);
    let AdvanceContext { spawned, cues, .. } = ctx;
    state.lasers.extend(spawned);
    sounds.extend(cues);

    let mut chosen = None;

    // Select picks the closest block above the ship within its column
    let select_pressed = input.select && !state.select_held;
    state.select_held = input.select;
    if select_pressed {
        let ship = state.player.pos;
        chosen = state
            .menu_blocks
            .iter()
            .filter(|b| b.bounds().spans_x(ship.x) && b.pos.y < ship.y)
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
            .and_then(block_action);
    }

    if chosen.is_none() {
        for laser in state.lasers.iter_mut().filter(|l| l.alive) {
            if let Some(block) = state.menu_blocks.iter().find(|b| b.overlaps(laser)) {
                laser.alive = false;
                chosen = block_action(block);
                break;
            }
        }
    }

    state
        .lasers
        .retain(|l| l.alive && !l.bounds().outside_playfield());

    if let Some(action) = chosen {
        activate(state, action, events)?;
    }
    Ok(())
}

/// Perform a menu block's action
pub fn activate(
    state: &mut GameState,
    action: MenuAction,
    events: &mut Vec<GameEvent>,
) -> Result<(), SimError> {
    log::info!("Menu action {:?}", action);
    events.push(GameEvent::MenuActivated { action });
    match action {
        MenuAction::Play => state.start_level(0)?,
        MenuAction::LevelSelect => state.enter_level_select(),
        MenuAction::StartLevel(level) => state.start_level(level)?,
        MenuAction::Back => state.enter_menu(),
        MenuAction::Quit => {
            state.phase = GamePhase::Quit;
            events.push(GameEvent::Quit);
        }
    }
    Ok(())
}
