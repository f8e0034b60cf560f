//! Decoder for the little-endian, version-gated `.nav` container.
//!
//! Every read is checked; the first short read, bad magic or unsupported
//! version aborts the whole load and no partial mesh escapes.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt};
use tracing::{debug, info, warn};

use crate::area::{
    CornerLight, Direction, EncounterPath, EncounterSpot, HidingSpot, NavArea, VisibleArea,
};
use crate::error::{Error, Result};
use crate::geometry::{AreaExtent, Vector3};
use crate::ladder::{Ladder, LadderAttachment, LadderDirection};
use crate::mesh::{FormatInfo, NavMesh, NavMeshBuilder};
use crate::place::Place;

/// Magic marker at the start of every nav file.
pub const NAV_MAGIC: u32 = 0xFEED_FACE;

/// Oldest major version the decoder accepts.
pub const MIN_MAJOR_VERSION: u32 = 6;

/// Newest major version the decoder accepts.
pub const MAX_MAJOR_VERSION: u32 = 16;

/// Size of one legacy approach-area record (three ids and two bytes).
const APPROACH_RECORD_SIZE: u64 = 4 * 3 + 2;

/// Size of one trailing per-area legacy record.
const TRAILING_RECORD_SIZE: u64 = 14;

/// Load, decode and link the nav file at `path`.
pub fn load_nav_mesh(path: &Path) -> Result<NavMesh> {
    let file = File::open(path)?;
    debug!(path = %path.display(), "opened nav mesh file");
    parse_nav_mesh(BufReader::new(file))
}

/// Decode and link a nav mesh from any byte stream.
pub fn parse_nav_mesh<R: Read>(reader: R) -> Result<NavMesh> {
    Ok(decode_nav_mesh(reader)?.link())
}

/// Decode a nav mesh into an unlinked builder.
///
/// Useful when the caller wants to choose [`crate::LinkOptions`] itself.
pub fn decode_nav_mesh<R: Read>(reader: R) -> Result<NavMeshBuilder> {
    NavReader { inner: reader }.decode()
}

struct NavReader<R> {
    inner: R,
}

impl<R: Read> NavReader<R> {
    fn read<T>(
        &mut self,
        section: &'static str,
        op: impl FnOnce(&mut R) -> io::Result<T>,
    ) -> Result<T> {
        op(&mut self.inner).map_err(|source| Error::TruncatedInput { section, source })
    }

    fn u8(&mut self, section: &'static str) -> Result<u8> {
        self.read(section, |r| r.read_u8())
    }

    fn u16(&mut self, section: &'static str) -> Result<u16> {
        self.read(section, |r| r.read_u16::<LittleEndian>())
    }

    fn u32(&mut self, section: &'static str) -> Result<u32> {
        self.read(section, |r| r.read_u32::<LittleEndian>())
    }

    fn f32(&mut self, section: &'static str) -> Result<f32> {
        self.read(section, |r| r.read_f32::<LittleEndian>())
    }

    fn bool(&mut self, section: &'static str) -> Result<bool> {
        Ok(self.u8(section)? > 0)
    }

    fn vector(&mut self, section: &'static str) -> Result<Vector3> {
        Ok(Vector3::new(
            self.f32(section)?,
            self.f32(section)?,
            self.f32(section)?,
        ))
    }

    fn bytes(&mut self, section: &'static str, len: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; len];
        self.read(section, |r| r.read_exact(&mut buf))?;
        Ok(buf)
    }

    fn skip(&mut self, section: &'static str, len: u64) -> Result<()> {
        let copied = self.read(section, |r| io::copy(&mut r.take(len), &mut io::sink()))?;
        if copied != len {
            return Err(Error::TruncatedInput {
                section,
                source: io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    format!("expected {len} bytes, found {copied}"),
                ),
            });
        }
        Ok(())
    }

    fn decode(mut self) -> Result<NavMeshBuilder> {
        let magic = self.u32("magic number")?;
        if magic != NAV_MAGIC {
            return Err(Error::InvalidMagic {
                found: magic,
                expected: NAV_MAGIC,
            });
        }

        let major = self.u32("major version")?;
        if !(MIN_MAJOR_VERSION..=MAX_MAJOR_VERSION).contains(&major) {
            return Err(Error::UnsupportedVersion {
                major,
                min: MIN_MAJOR_VERSION,
                max: MAX_MAJOR_VERSION,
            });
        }

        let mut format = FormatInfo {
            major_version: major,
            ..FormatInfo::default()
        };
        if major >= 10 {
            format.minor_version = self.u32("minor version")?;
        }
        format.bsp_size = self.u32("bsp size")?;
        if major >= 14 {
            format.is_analyzed = self.bool("analyzed flag")?;
        }

        let mut builder = NavMeshBuilder::new();

        let place_count = self.u16("place count")?;
        for index in 0..place_count {
            let len = self.u16("place name length")?;
            let raw = self.bytes("place name", usize::from(len))?;
            let name = String::from_utf8_lossy(&raw)
                .trim_end_matches('\0')
                .to_string();
            builder.add_place(Place::new(u32::from(index) + 1, name));
        }

        if major > 11 {
            format.has_unnamed_areas = self.bool("unnamed areas flag")?;
        }
        builder.set_format(format);

        let area_count = self.u32("area count")?;
        for _ in 0..area_count {
            let area = self.area(major)?;
            builder.add_area(area);
        }

        let ladder_count = self.u32("ladder count")?;
        for _ in 0..ladder_count {
            let ladder = self.ladder()?;
            builder.add_ladder(ladder);
        }

        info!(
            major_version = format.major_version,
            minor_version = format.minor_version,
            places = place_count,
            areas = area_count,
            ladders = ladder_count,
            "decoded nav mesh"
        );

        Ok(builder)
    }

    fn area(&mut self, major: u32) -> Result<NavArea> {
        let id = self.u32("area id")?;
        let flags = if major <= 8 {
            u32::from(self.u8("area flags")?)
        } else if major < 13 {
            u32::from(self.u16("area flags")?)
        } else {
            self.u32("area flags")?
        };

        let extent = AreaExtent {
            north_west: self.vector("area north-west corner")?,
            south_east: self.vector("area south-east corner")?,
            north_east_z: self.f32("area north-east height")?,
            south_west_z: self.f32("area south-west height")?,
        };
        let mut area = NavArea::new(id, extent);
        area.flags = flags;

        for direction in Direction::ALL {
            let count = self.u32("connection count")?;
            for _ in 0..count {
                let target = self.u32("connection target")?;
                area.connect(target, direction);
            }
        }

        let spot_count = self.u8("hiding spot count")?;
        for _ in 0..spot_count {
            area.hiding_spots.push(HidingSpot {
                id: self.u32("hiding spot id")?,
                location: self.vector("hiding spot location")?,
                flags: self.u8("hiding spot flags")?,
            });
        }

        if major < 15 {
            let approach_count = self.u8("approach area count")?;
            self.skip(
                "approach areas",
                u64::from(approach_count) * APPROACH_RECORD_SIZE,
            )?;
        }

        let path_count = self.u32("encounter path count")?;
        for _ in 0..path_count {
            let from_id = self.u32("encounter path source")?;
            let from_direction = self.u8("encounter path source direction")?;
            let to_id = self.u32("encounter path destination")?;
            let to_direction = self.u8("encounter path destination direction")?;

            let spot_count = self.u8("encounter spot count")?;
            let mut spots = Vec::with_capacity(usize::from(spot_count));
            for _ in 0..spot_count {
                let order_id = self.u32("encounter spot order")?;
                let distance = self.u8("encounter spot distance")?;
                spots.push(EncounterSpot {
                    order_id,
                    parametric_distance: f32::from(distance) / 255.0,
                });
            }

            area.encounter_paths.push(EncounterPath {
                from_id,
                from: None,
                from_direction,
                to_id,
                to: None,
                to_direction,
                spots,
            });
        }

        let place_id = self.u16("area place id")?;
        area.place = (place_id != 0).then_some(u32::from(place_id));

        for direction in LadderDirection::ALL {
            let count = self.u32("ladder connection count")?;
            for _ in 0..count {
                let ladder = self.u32("ladder connection target")?;
                area.connect_ladder(ladder, direction);
            }
        }

        area.earliest_occupy_time = [
            self.f32("earliest occupy time")?,
            self.f32("earliest occupy time")?,
        ];

        if major >= 11 {
            area.light_intensity = CornerLight {
                north_west: self.f32("light intensity")?,
                north_east: self.f32("light intensity")?,
                south_east: self.f32("light intensity")?,
                south_west: self.f32("light intensity")?,
            };
        }

        if major >= 16 {
            let visible_count = self.u32("visible area count")?;
            for _ in 0..visible_count {
                area.visible_areas.push(VisibleArea {
                    area_id: self.u32("visible area id")?,
                    area: None,
                    attributes: self.u8("visible area attributes")?,
                });
            }
        }

        area.inherit_visibility_from = self.u32("inherited visibility area")?;

        let trailing = self.u8("trailing record count")?;
        self.skip(
            "trailing records",
            u64::from(trailing) * TRAILING_RECORD_SIZE,
        )?;

        Ok(area)
    }

    fn ladder(&mut self) -> Result<Ladder> {
        let id = self.u32("ladder id")?;
        let width = self.f32("ladder width")?;
        let top = self.vector("ladder top")?;
        let bottom = self.vector("ladder bottom")?;
        let length = self.f32("ladder length")?;
        let raw_direction = self.u32("ladder direction")?;
        let direction = LadderDirection::from_u32(raw_direction).unwrap_or_else(|| {
            warn!(ladder = id, raw_direction, "unknown ladder direction, assuming up");
            LadderDirection::Up
        });

        let mut ladder = Ladder::new(id, top, bottom, direction);
        ladder.width = width;
        ladder.length = length;
        ladder.top_forward = LadderAttachment::new(self.u32("ladder top-forward area")?);
        ladder.top_left = LadderAttachment::new(self.u32("ladder top-left area")?);
        ladder.top_right = LadderAttachment::new(self.u32("ladder top-right area")?);
        ladder.top_behind = LadderAttachment::new(self.u32("ladder top-behind area")?);
        ladder.bottom_area = LadderAttachment::new(self.u32("ladder bottom area")?);
        Ok(ladder)
    }
}
