use daliary_game::board::{BoardState, Tile};
use daliary_game::constants::CELL_COUNT;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub state: BoardState,
}

/// The 4x4 grid. Tiles are absolutely positioned from their cell
/// coordinates and keyed by id so the browser can animate slides.
#[function_component(BoardView)]
pub fn board_view(p: &Props) -> Html {
    let backdrop = (0..CELL_COUNT).map(|i| {
        html! { <div class="cell" key={format!("cell-{i}")} /> }
    });
    let tiles = p.state.tiles.iter().map(render_tile);
    html! {
        <div class="board" role="grid" aria-label="2048 board">
            { for backdrop }
            { for tiles }
        </div>
    }
}

fn render_tile(tile: &Tile) -> Html {
    let class = classes!(
        "tile",
        format!("tile-{}", tile.value),
        format!("pos-{}-{}", tile.x, tile.y),
    );
    html! {
        <div key={tile.id.0} {class}>{ tile.value }</div>
    }
}
