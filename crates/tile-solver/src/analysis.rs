//! Pairwise edge-compatibility report for a catalog.
//!
//! Counts, for every ordered pair of distinct tiles, which canonical edges
//! could ever touch. Useful for spotting tiles with very few partners before
//! running a full search.

use serde::Serialize;
use smallvec::SmallVec;

use crate::pruning::compatible;
use crate::puzzle::{Side, Tile, TileCatalog};

/// Compatible `(side of a, side of b)` pairs between two tiles, in canonical orientation
pub fn compatible_sides(a: &Tile, b: &Tile) -> SmallVec<[(Side, Side); 16]> {
    let mut pairs = SmallVec::new();
    for side_a in Side::ALL {
        for side_b in Side::ALL {
            if compatible(a.edges[side_a.index()], b.edges[side_b.index()]) {
                pairs.push((side_a, side_b));
            }
        }
    }
    pairs
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerEdges {
    pub tile_id: u32,
    pub sides: Vec<(Side, Side)>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TileAffinity {
    pub tile_id: u32,
    /// Partners with at least one compatible edge pair
    pub partners: Vec<PartnerEdges>,
    /// Compatible edge pairs summed over all partners
    pub total: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PairReport {
    /// Ordered pairs of distinct tiles examined
    pub pairs_examined: usize,
    pub tiles: Vec<TileAffinity>,
}

pub fn pair_report(catalog: &TileCatalog) -> PairReport {
    let mut pairs_examined = 0;
    let mut tiles = Vec::with_capacity(catalog.len());

    for (i, a) in catalog.tiles.iter().enumerate() {
        let mut partners = Vec::new();
        let mut total = 0;

        for (j, b) in catalog.tiles.iter().enumerate() {
            if i == j {
                continue;
            }
            pairs_examined += 1;

            let sides = compatible_sides(a, b);
            if !sides.is_empty() {
                total += sides.len();
                partners.push(PartnerEdges {
                    tile_id: b.id,
                    sides: sides.into_vec(),
                });
            }
        }

        tiles.push(TileAffinity {
            tile_id: a.id,
            partners,
            total,
        });
    }

    PairReport {
        pairs_examined,
        tiles,
    }
}
