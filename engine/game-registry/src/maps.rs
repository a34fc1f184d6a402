use crate::types::MapGroup;

/// Known maps and the `mapId` values of their modes, in display order
const MAP_GROUPS: &[MapGroup] = &[
    MapGroup {
        key: "bakeshi",
        name: "Bakeshi",
        ids: &[8101, 8102, 8103],
    },
    MapGroup {
        key: "zero-dam",
        name: "Zero Dam",
        ids: &[2201, 2202, 2211, 2212, 2231, 2232, 2233, 2242],
    },
    MapGroup {
        key: "longbow-valley",
        name: "Longbow Valley",
        ids: &[1901, 1902, 1911, 1912, 1999],
    },
    MapGroup {
        key: "space-city",
        name: "Space City",
        ids: &[3901, 3902],
    },
    MapGroup {
        key: "tide-prison",
        name: "Tide Prison",
        ids: &[8803],
    },
];

/// Mode names keyed by map id
const MAP_MODES: &[(i64, &str)] = &[
    (8101, "Confidential"),
    (8102, "Critical Supplies"),
    (8103, "Squad"),
    (2201, "Confidential"),
    (2202, "Critical Supplies"),
    (2211, "Squad"),
    (2212, "Lab"),
    (2231, "Heavy Cargo"),
    (2232, "High-Value Target"),
    (2233, "Squad"),
    (2242, "Lab"),
    (1901, "Confidential"),
    (1902, "Critical Supplies"),
    (1911, "Squad"),
    (1912, "Lab"),
    (1999, "Heavy Cargo"),
    (3901, "Confidential"),
    (3902, "Critical Supplies"),
    (8803, "Confidential"),
];

/// Map Directory - static lookup of map ids to map/mode names
#[derive(Debug, Clone, Copy, Default)]
pub struct MapDirectory;

impl MapDirectory {
    /// Create the directory
    pub fn new() -> Self {
        Self
    }

    /// All map groups in display order
    pub fn groups(&self) -> &'static [MapGroup] {
        MAP_GROUPS
    }

    /// The group a map id belongs to, if any
    pub fn group_for(&self, map_id: i64) -> Option<&'static MapGroup> {
        MAP_GROUPS.iter().find(|group| group.contains(map_id))
    }

    /// Display name as "<map> - <mode>", or a placeholder for unknown ids
    pub fn display_name(&self, map_id: i64) -> String {
        let mode = MAP_MODES
            .iter()
            .find(|(id, _)| *id == map_id)
            .map(|(_, mode)| *mode);
        match (self.group_for(map_id), mode) {
            (Some(group), Some(mode)) => format!("{} - {}", group.name, mode),
            (Some(group), None) => group.name.to_string(),
            _ => format!("Map {map_id}"),
        }
    }
}
