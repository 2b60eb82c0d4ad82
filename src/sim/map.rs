//! Map catalog: named lane layouts

use rand::Rng;

use super::lane::generate_lane;
use super::state::{LaneState, LaneType, MapType};
use crate::consts::NUM_LANES;

use LaneType::{Grass as G, Road as R, Water as W};

const CLASSIC: [LaneType; NUM_LANES] = [G, W, W, W, W, W, G, R, R, R, R, R, G];
const LOS_ANGELES: [LaneType; NUM_LANES] = [G, R, R, R, R, R, R, R, R, R, R, R, G];
const VENICE: [LaneType; NUM_LANES] = [G, W, W, W, W, W, W, W, W, W, W, W, G];
const EXPERT: [LaneType; NUM_LANES] = [G, W, R, W, R, W, W, R, W, R, R, W, G];

/// Lane types of a map, winning edge first
pub fn lane_types(map_type: MapType) -> &'static [LaneType; NUM_LANES] {
    match map_type {
        MapType::Classic => &CLASSIC,
        MapType::LosAngeles => &LOS_ANGELES,
        MapType::Venice => &VENICE,
        MapType::Expert => &EXPERT,
    }
}

/// Generate fresh runtime lanes for a map
pub fn lanes_for_map(map_type: MapType, game_width: f32, rng: &mut impl Rng) -> Vec<LaneState> {
    log::debug!("Generating {} lanes (width {})", map_type.as_str(), game_width);
    lane_types(map_type)
        .iter()
        .map(|&lane_type| generate_lane(lane_type, game_width, rng))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_edges_are_grass() {
        for map in MapType::ALL {
            let types = lane_types(map);
            assert_eq!(types[0], LaneType::Grass, "{map:?}");
            assert_eq!(types[NUM_LANES - 1], LaneType::Grass, "{map:?}");
        }
    }

    #[test]
    fn test_classic_layout() {
        let types = lane_types(MapType::Classic);
        assert!(types[1..6].iter().all(|&t| t == LaneType::Water));
        assert_eq!(types[6], LaneType::Grass);
        assert!(types[7..12].iter().all(|&t| t == LaneType::Road));
    }

    #[test]
    fn test_expert_layout() {
        let expected = [G, W, R, W, R, W, W, R, W, R, R, W, G];
        assert_eq!(lane_types(MapType::Expert), &expected);
    }

    #[test]
    fn test_lanes_match_layout() {
        let mut rng = Pcg32::seed_from_u64(2024);
        for map in MapType::ALL {
            let lanes = lanes_for_map(map, 480.0, &mut rng);
            assert_eq!(lanes.len(), NUM_LANES);
            for (lane, &expected) in lanes.iter().zip(lane_types(map)) {
                assert_eq!(lane.lane_type(), expected);
                assert_eq!(lane.moving().is_some(), expected != LaneType::Grass);
            }
        }
    }
}
