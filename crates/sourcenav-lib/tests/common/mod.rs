//! Common test utilities and fixture helpers.
//!
//! Nav files are produced on the fly by [`NavFixture::encode`], which writes
//! the same little-endian layout the loader reads, gated by major version.

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use byteorder::{LittleEndian, WriteBytesExt};
use tempfile::TempDir;

pub const MAGIC: u32 = 0xFEED_FACE;

#[derive(Debug, Clone, Default)]
pub struct FixtureEncounterPath {
    pub from: u32,
    pub from_direction: u8,
    pub to: u32,
    pub to_direction: u8,
    /// `(order id, distance byte)` pairs.
    pub spots: Vec<(u32, u8)>,
}

#[derive(Debug, Clone, Default)]
pub struct FixtureArea {
    pub id: u32,
    pub flags: u32,
    pub north_west: [f32; 3],
    pub south_east: [f32; 3],
    pub north_east_z: f32,
    pub south_west_z: f32,
    /// Connection targets per direction: north, east, south, west.
    pub connections: [Vec<u32>; 4],
    pub hiding_spots: Vec<(u32, [f32; 3], u8)>,
    /// Legacy approach records, written only before major version 15.
    pub approach_areas: u8,
    pub encounter_paths: Vec<FixtureEncounterPath>,
    pub place: u16,
    /// Ladder ids per direction: up, down.
    pub ladders: [Vec<u32>; 2],
    pub occupy_times: [f32; 2],
    pub light: [f32; 4],
    pub visible_areas: Vec<(u32, u8)>,
    pub inherit_visibility_from: u32,
    pub trailing_records: u8,
}

impl FixtureArea {
    pub fn flat(id: u32, nw: (f32, f32), se: (f32, f32), z: f32) -> Self {
        Self {
            id,
            north_west: [nw.0, nw.1, z],
            south_east: [se.0, se.1, z],
            north_east_z: z,
            south_west_z: z,
            ..Self::default()
        }
    }

    pub fn north(mut self, target: u32) -> Self {
        self.connections[0].push(target);
        self
    }

    pub fn east(mut self, target: u32) -> Self {
        self.connections[1].push(target);
        self
    }

    pub fn south(mut self, target: u32) -> Self {
        self.connections[2].push(target);
        self
    }

    pub fn west(mut self, target: u32) -> Self {
        self.connections[3].push(target);
        self
    }

    pub fn ladder_up(mut self, ladder: u32) -> Self {
        self.ladders[0].push(ladder);
        self
    }

    pub fn ladder_down(mut self, ladder: u32) -> Self {
        self.ladders[1].push(ladder);
        self
    }

    pub fn in_place(mut self, place: u16) -> Self {
        self.place = place;
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct FixtureLadder {
    pub id: u32,
    pub width: f32,
    pub top: [f32; 3],
    pub bottom: [f32; 3],
    pub length: f32,
    pub direction: u32,
    pub top_forward: u32,
    pub top_left: u32,
    pub top_right: u32,
    pub top_behind: u32,
    pub bottom_area: u32,
}

#[derive(Debug, Clone)]
pub struct NavFixture {
    pub major: u32,
    pub minor: u32,
    pub bsp_size: u32,
    pub analyzed: bool,
    pub places: Vec<String>,
    pub has_unnamed_areas: bool,
    pub areas: Vec<FixtureArea>,
    pub ladders: Vec<FixtureLadder>,
}

impl Default for NavFixture {
    fn default() -> Self {
        Self {
            major: 16,
            minor: 1,
            bsp_size: 4096,
            analyzed: true,
            places: Vec::new(),
            has_unnamed_areas: false,
            areas: Vec::new(),
            ladders: Vec::new(),
        }
    }
}

fn write_vector(out: &mut Vec<u8>, v: [f32; 3]) {
    for component in v {
        out.write_f32::<LittleEndian>(component).unwrap();
    }
}

impl NavFixture {
    /// Corridor 1 -> 2 -> 3 plus a ladder from area 4 up to area 5.
    ///
    /// Areas 1 and 3 belong to `BombsiteA` and `BombsiteB`. Walking the
    /// corridor costs 20; climbing the ladder costs 15 (flat center distance
    /// 5 plus ladder length 10).
    pub fn sample() -> Self {
        let mut corridor_start = FixtureArea::flat(1, (0.0, 0.0), (10.0, 10.0), 0.0)
            .east(2)
            .in_place(1);
        corridor_start.flags = 0x02;
        corridor_start.hiding_spots.push((11, [2.0, 2.0, 0.0], 0x04));
        corridor_start.encounter_paths.push(FixtureEncounterPath {
            from: 2,
            from_direction: 1,
            to: 99,
            to_direction: 3,
            spots: vec![(11, 255), (12, 0)],
        });
        corridor_start.visible_areas.push((3, 1));
        corridor_start.occupy_times = [4.5, 6.0];
        corridor_start.light = [0.1, 0.2, 0.3, 0.4];
        corridor_start.approach_areas = 1;
        corridor_start.trailing_records = 1;

        let bottom = FixtureArea::flat(4, (0.0, 20.0), (10.0, 30.0), 0.0).ladder_up(1);
        let top = FixtureArea::flat(5, (6.0, 27.0), (10.0, 31.0), 8.0).ladder_down(1);

        Self {
            places: vec!["BombsiteA".to_string(), "BombsiteB".to_string()],
            areas: vec![
                corridor_start,
                FixtureArea::flat(2, (10.0, 0.0), (20.0, 10.0), 0.0)
                    .west(1)
                    .east(3)
                    .north(99),
                FixtureArea::flat(3, (20.0, 0.0), (30.0, 10.0), 0.0)
                    .west(2)
                    .in_place(2),
                bottom,
                top,
            ],
            ladders: vec![FixtureLadder {
                id: 1,
                width: 20.0,
                top: [8.0, 29.0, 8.0],
                bottom: [8.0, 25.0, 0.0],
                length: 10.0,
                direction: 0,
                top_forward: 5,
                bottom_area: 4,
                ..FixtureLadder::default()
            }],
            ..Self::default()
        }
    }

    pub fn with_major(mut self, major: u32) -> Self {
        self.major = major;
        self
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.write_u32::<LittleEndian>(MAGIC).unwrap();
        out.write_u32::<LittleEndian>(self.major).unwrap();
        if self.major >= 10 {
            out.write_u32::<LittleEndian>(self.minor).unwrap();
        }
        out.write_u32::<LittleEndian>(self.bsp_size).unwrap();
        if self.major >= 14 {
            out.write_u8(u8::from(self.analyzed)).unwrap();
        }

        out.write_u16::<LittleEndian>(self.places.len() as u16)
            .unwrap();
        for name in &self.places {
            let mut bytes = name.as_bytes().to_vec();
            bytes.push(0);
            out.write_u16::<LittleEndian>(bytes.len() as u16).unwrap();
            out.extend_from_slice(&bytes);
        }
        if self.major > 11 {
            out.write_u8(u8::from(self.has_unnamed_areas)).unwrap();
        }

        out.write_u32::<LittleEndian>(self.areas.len() as u32)
            .unwrap();
        for area in &self.areas {
            self.encode_area(&mut out, area);
        }

        out.write_u32::<LittleEndian>(self.ladders.len() as u32)
            .unwrap();
        for ladder in &self.ladders {
            out.write_u32::<LittleEndian>(ladder.id).unwrap();
            out.write_f32::<LittleEndian>(ladder.width).unwrap();
            write_vector(&mut out, ladder.top);
            write_vector(&mut out, ladder.bottom);
            out.write_f32::<LittleEndian>(ladder.length).unwrap();
            out.write_u32::<LittleEndian>(ladder.direction).unwrap();
            for id in [
                ladder.top_forward,
                ladder.top_left,
                ladder.top_right,
                ladder.top_behind,
                ladder.bottom_area,
            ] {
                out.write_u32::<LittleEndian>(id).unwrap();
            }
        }
        out
    }

    fn encode_area(&self, out: &mut Vec<u8>, area: &FixtureArea) {
        out.write_u32::<LittleEndian>(area.id).unwrap();
        if self.major <= 8 {
            out.write_u8(area.flags as u8).unwrap();
        } else if self.major < 13 {
            out.write_u16::<LittleEndian>(area.flags as u16).unwrap();
        } else {
            out.write_u32::<LittleEndian>(area.flags).unwrap();
        }
        write_vector(out, area.north_west);
        write_vector(out, area.south_east);
        out.write_f32::<LittleEndian>(area.north_east_z).unwrap();
        out.write_f32::<LittleEndian>(area.south_west_z).unwrap();

        for targets in &area.connections {
            out.write_u32::<LittleEndian>(targets.len() as u32).unwrap();
            for target in targets {
                out.write_u32::<LittleEndian>(*target).unwrap();
            }
        }

        out.write_u8(area.hiding_spots.len() as u8).unwrap();
        for (id, location, flags) in &area.hiding_spots {
            out.write_u32::<LittleEndian>(*id).unwrap();
            write_vector(out, *location);
            out.write_u8(*flags).unwrap();
        }

        if self.major < 15 {
            out.write_u8(area.approach_areas).unwrap();
            out.extend(std::iter::repeat(0xAB).take(usize::from(area.approach_areas) * 14));
        }

        out.write_u32::<LittleEndian>(area.encounter_paths.len() as u32)
            .unwrap();
        for path in &area.encounter_paths {
            out.write_u32::<LittleEndian>(path.from).unwrap();
            out.write_u8(path.from_direction).unwrap();
            out.write_u32::<LittleEndian>(path.to).unwrap();
            out.write_u8(path.to_direction).unwrap();
            out.write_u8(path.spots.len() as u8).unwrap();
            for (order, distance) in &path.spots {
                out.write_u32::<LittleEndian>(*order).unwrap();
                out.write_u8(*distance).unwrap();
            }
        }

        out.write_u16::<LittleEndian>(area.place).unwrap();

        for ladders in &area.ladders {
            out.write_u32::<LittleEndian>(ladders.len() as u32).unwrap();
            for ladder in ladders {
                out.write_u32::<LittleEndian>(*ladder).unwrap();
            }
        }

        for time in area.occupy_times {
            out.write_f32::<LittleEndian>(time).unwrap();
        }

        if self.major >= 11 {
            for intensity in area.light {
                out.write_f32::<LittleEndian>(intensity).unwrap();
            }
        }

        if self.major >= 16 {
            out.write_u32::<LittleEndian>(area.visible_areas.len() as u32)
                .unwrap();
            for (id, attributes) in &area.visible_areas {
                out.write_u32::<LittleEndian>(*id).unwrap();
                out.write_u8(*attributes).unwrap();
            }
        }

        out.write_u32::<LittleEndian>(area.inherit_visibility_from)
            .unwrap();
        out.write_u8(area.trailing_records).unwrap();
        out.extend(std::iter::repeat(0xCD).take(usize::from(area.trailing_records) * 14));
    }
}

/// A nav file written to a temporary directory that lives as long as the value.
pub struct NavFile {
    _temp_dir: TempDir,
    pub path: PathBuf,
}

impl NavFile {
    pub fn write(fixture: &NavFixture) -> Self {
        let temp_dir = tempfile::tempdir().expect("create temp dir");
        let path = temp_dir.path().join("fixture.nav");
        fs::write(&path, fixture.encode()).expect("write nav fixture");
        Self {
            _temp_dir: temp_dir,
            path,
        }
    }
}
