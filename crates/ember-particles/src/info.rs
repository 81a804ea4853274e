//! Spawn descriptor: per-system configuration decoded from TOML or the
//! packed binary format written by the external particle editor.

use byteorder::{LittleEndian, ReadBytesExt};
use ember_core::{Color, EmberError, Result};
use std::io::Cursor;
use std::path::Path;

/// Size of a packed binary descriptor in bytes
pub const PACKED_SIZE: usize = 128;

/// System lifetime value meaning "run forever"
pub const LIFETIME_INFINITE: f32 = -1.0;

/// Per-system spawn configuration.
///
/// Angles are radians; colors are RGBA in [0, 1]. `*_var` fields are
/// variance factors in [0, 1] biasing the sampled start value toward the
/// end value.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleSystemInfo {
    /// Opaque texture/blend handle from the editor format. Carried
    /// through untouched; the simulation never interprets it.
    pub resource_handle: u32,

    /// Particles emitted per second
    pub emission: f32,
    /// System lifetime in seconds, or `LIFETIME_INFINITE`
    pub lifetime: f32,
    pub particle_life_min: f32,
    pub particle_life_max: f32,

    /// Emission direction in radians
    pub direction: f32,
    /// Angular spread of the emission cone in radians
    pub spread: f32,
    /// Rotate the emission cone to follow the system's direction of travel
    pub relative: bool,

    pub speed_min: f32,
    pub speed_max: f32,
    pub gravity_min: f32,
    pub gravity_max: f32,
    pub radial_accel_min: f32,
    pub radial_accel_max: f32,
    pub tangential_accel_min: f32,
    pub tangential_accel_max: f32,

    pub size_start: f32,
    pub size_end: f32,
    pub size_var: f32,

    pub spin_start: f32,
    pub spin_end: f32,
    pub spin_var: f32,

    pub color_start: Color,
    pub color_end: Color,
    pub color_var: f32,
    pub alpha_var: f32,
}

impl Default for ParticleSystemInfo {
    fn default() -> Self {
        Self {
            resource_handle: 0,
            emission: 10.0,
            lifetime: LIFETIME_INFINITE,
            particle_life_min: 1.0,
            particle_life_max: 2.0,
            direction: 0.0,
            spread: std::f32::consts::FRAC_PI_4,
            relative: false,
            speed_min: 50.0,
            speed_max: 100.0,
            gravity_min: 0.0,
            gravity_max: 0.0,
            radial_accel_min: 0.0,
            radial_accel_max: 0.0,
            tangential_accel_min: 0.0,
            tangential_accel_max: 0.0,
            size_start: 10.0,
            size_end: 2.0,
            size_var: 0.0,
            spin_start: 0.0,
            spin_end: 0.0,
            spin_var: 0.0,
            color_start: Color::WHITE,
            color_end: Color::TRANSPARENT,
            color_var: 0.0,
            alpha_var: 0.0,
        }
    }
}

impl ParticleSystemInfo {
    /// Load a descriptor from disk. `.psi` files decode as the packed
    /// binary format, everything else parses as TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let is_packed = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("psi"));

        if is_packed {
            let bytes = std::fs::read(path)?;
            Self::from_packed(&bytes)
        } else {
            let text = std::fs::read_to_string(path)?;
            let table: toml::value::Table = toml::from_str(&text)?;
            Ok(Self::from_toml(&table))
        }
    }

    /// Parse a descriptor from a TOML table. Unknown keys are ignored,
    /// missing keys keep their defaults.
    pub fn from_toml(table: &toml::value::Table) -> Self {
        let mut info = Self::default();

        if let Some(v) = table.get("emission") {
            info.emission = toml_f32(v, info.emission);
        }
        if let Some(v) = table.get("lifetime") {
            info.lifetime = toml_f32(v, info.lifetime);
        }
        if let Some(v) = table.get("particle_life_min") {
            info.particle_life_min = toml_f32(v, info.particle_life_min);
        }
        if let Some(v) = table.get("particle_life_max") {
            info.particle_life_max = toml_f32(v, info.particle_life_max);
        }
        if let Some(v) = table.get("direction") {
            info.direction = toml_f32(v, info.direction);
        }
        if let Some(v) = table.get("spread") {
            info.spread = toml_f32(v, info.spread);
        }
        if let Some(v) = table.get("relative") {
            info.relative = v.as_bool().unwrap_or(false);
        }
        if let Some(v) = table.get("speed_min") {
            info.speed_min = toml_f32(v, info.speed_min);
        }
        if let Some(v) = table.get("speed_max") {
            info.speed_max = toml_f32(v, info.speed_max);
        }
        if let Some(v) = table.get("gravity_min") {
            info.gravity_min = toml_f32(v, info.gravity_min);
        }
        if let Some(v) = table.get("gravity_max") {
            info.gravity_max = toml_f32(v, info.gravity_max);
        }
        if let Some(v) = table.get("radial_accel_min") {
            info.radial_accel_min = toml_f32(v, info.radial_accel_min);
        }
        if let Some(v) = table.get("radial_accel_max") {
            info.radial_accel_max = toml_f32(v, info.radial_accel_max);
        }
        if let Some(v) = table.get("tangential_accel_min") {
            info.tangential_accel_min = toml_f32(v, info.tangential_accel_min);
        }
        if let Some(v) = table.get("tangential_accel_max") {
            info.tangential_accel_max = toml_f32(v, info.tangential_accel_max);
        }
        if let Some(v) = table.get("size_start") {
            info.size_start = toml_f32(v, info.size_start);
        }
        if let Some(v) = table.get("size_end") {
            info.size_end = toml_f32(v, info.size_end);
        }
        if let Some(v) = table.get("size_var") {
            info.size_var = toml_f32(v, info.size_var);
        }
        if let Some(v) = table.get("spin_start") {
            info.spin_start = toml_f32(v, info.spin_start);
        }
        if let Some(v) = table.get("spin_end") {
            info.spin_end = toml_f32(v, info.spin_end);
        }
        if let Some(v) = table.get("spin_var") {
            info.spin_var = toml_f32(v, info.spin_var);
        }
        if let Some(v) = table.get("color_start") {
            info.color_start = Color::from_array(toml_vec4(v, info.color_start.to_array()));
        }
        if let Some(v) = table.get("color_end") {
            info.color_end = Color::from_array(toml_vec4(v, info.color_end.to_array()));
        }
        if let Some(v) = table.get("color_var") {
            info.color_var = toml_f32(v, info.color_var);
        }
        if let Some(v) = table.get("alpha_var") {
            info.alpha_var = toml_f32(v, info.alpha_var);
        }

        info
    }

    /// Serialize to a TOML table with the same key names `from_toml` reads
    pub fn to_toml(&self) -> toml::value::Table {
        let mut t = toml::value::Table::new();
        let mut f = |key: &str, value: f32| {
            t.insert(key.to_string(), toml::Value::Float(value as f64));
        };
        f("emission", self.emission);
        f("lifetime", self.lifetime);
        f("particle_life_min", self.particle_life_min);
        f("particle_life_max", self.particle_life_max);
        f("direction", self.direction);
        f("spread", self.spread);
        f("speed_min", self.speed_min);
        f("speed_max", self.speed_max);
        f("gravity_min", self.gravity_min);
        f("gravity_max", self.gravity_max);
        f("radial_accel_min", self.radial_accel_min);
        f("radial_accel_max", self.radial_accel_max);
        f("tangential_accel_min", self.tangential_accel_min);
        f("tangential_accel_max", self.tangential_accel_max);
        f("size_start", self.size_start);
        f("size_end", self.size_end);
        f("size_var", self.size_var);
        f("spin_start", self.spin_start);
        f("spin_end", self.spin_end);
        f("spin_var", self.spin_var);
        f("color_var", self.color_var);
        f("alpha_var", self.alpha_var);
        t.insert(
            "relative".to_string(),
            toml::Value::Boolean(self.relative),
        );
        t.insert(
            "color_start".to_string(),
            color_to_toml(self.color_start),
        );
        t.insert("color_end".to_string(), color_to_toml(self.color_end));
        t
    }

    /// Render the descriptor as a TOML document
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(&toml::Value::Table(self.to_toml()))?)
    }

    /// Decode the packed 128-byte little-endian editor format.
    ///
    /// Fields are read in declared order; a buffer of any other size is
    /// rejected before any field is parsed.
    pub fn from_packed(data: &[u8]) -> Result<Self> {
        if data.len() != PACKED_SIZE {
            return Err(EmberError::Descriptor(format!(
                "packed descriptor must be {PACKED_SIZE} bytes, got {}",
                data.len()
            )));
        }
        let mut r = Cursor::new(data);

        // Reads below cannot fail: the length was checked up front
        let resource_handle = r.read_u32::<LittleEndian>()?;
        let emission = r.read_i32::<LittleEndian>()? as f32;
        let lifetime = r.read_f32::<LittleEndian>()?;
        let particle_life_min = r.read_f32::<LittleEndian>()?;
        let particle_life_max = r.read_f32::<LittleEndian>()?;
        let direction = r.read_f32::<LittleEndian>()?;
        let spread = r.read_f32::<LittleEndian>()?;
        let relative = r.read_u32::<LittleEndian>()? != 0;
        let speed_min = r.read_f32::<LittleEndian>()?;
        let speed_max = r.read_f32::<LittleEndian>()?;
        let gravity_min = r.read_f32::<LittleEndian>()?;
        let gravity_max = r.read_f32::<LittleEndian>()?;
        let radial_accel_min = r.read_f32::<LittleEndian>()?;
        let radial_accel_max = r.read_f32::<LittleEndian>()?;
        let tangential_accel_min = r.read_f32::<LittleEndian>()?;
        let tangential_accel_max = r.read_f32::<LittleEndian>()?;
        let size_start = r.read_f32::<LittleEndian>()?;
        let size_end = r.read_f32::<LittleEndian>()?;
        let size_var = r.read_f32::<LittleEndian>()?;
        let spin_start = r.read_f32::<LittleEndian>()?;
        let spin_end = r.read_f32::<LittleEndian>()?;
        let spin_var = r.read_f32::<LittleEndian>()?;
        let color_start = read_color(&mut r)?;
        let color_end = read_color(&mut r)?;
        let color_var = r.read_f32::<LittleEndian>()?;
        let alpha_var = r.read_f32::<LittleEndian>()?;

        Ok(Self {
            resource_handle,
            emission,
            lifetime,
            particle_life_min,
            particle_life_max,
            direction,
            spread,
            relative,
            speed_min,
            speed_max,
            gravity_min,
            gravity_max,
            radial_accel_min,
            radial_accel_max,
            tangential_accel_min,
            tangential_accel_max,
            size_start,
            size_end,
            size_var,
            spin_start,
            spin_end,
            spin_var,
            color_start,
            color_end,
            color_var,
            alpha_var,
        })
    }

    /// Encode to the packed 128-byte format, field order matching
    /// `from_packed`
    pub fn to_packed(&self) -> Vec<u8> {
        let mut w = Vec::with_capacity(PACKED_SIZE);
        w.extend_from_slice(&self.resource_handle.to_le_bytes());
        w.extend_from_slice(&(self.emission as i32).to_le_bytes());
        for v in [
            self.lifetime,
            self.particle_life_min,
            self.particle_life_max,
            self.direction,
            self.spread,
        ] {
            w.extend_from_slice(&v.to_le_bytes());
        }
        w.extend_from_slice(&u32::from(self.relative).to_le_bytes());
        for v in [
            self.speed_min,
            self.speed_max,
            self.gravity_min,
            self.gravity_max,
            self.radial_accel_min,
            self.radial_accel_max,
            self.tangential_accel_min,
            self.tangential_accel_max,
            self.size_start,
            self.size_end,
            self.size_var,
            self.spin_start,
            self.spin_end,
            self.spin_var,
        ] {
            w.extend_from_slice(&v.to_le_bytes());
        }
        for c in self
            .color_start
            .to_array()
            .into_iter()
            .chain(self.color_end.to_array())
        {
            w.extend_from_slice(&c.to_le_bytes());
        }
        w.extend_from_slice(&self.color_var.to_le_bytes());
        w.extend_from_slice(&self.alpha_var.to_le_bytes());
        debug_assert_eq!(w.len(), PACKED_SIZE);
        w
    }
}

fn read_color(r: &mut Cursor<&[u8]>) -> Result<Color> {
    Ok(Color::new(
        r.read_f32::<LittleEndian>()?,
        r.read_f32::<LittleEndian>()?,
        r.read_f32::<LittleEndian>()?,
        r.read_f32::<LittleEndian>()?,
    ))
}

fn color_to_toml(c: Color) -> toml::Value {
    toml::Value::Array(
        c.to_array()
            .into_iter()
            .map(|v| toml::Value::Float(v as f64))
            .collect(),
    )
}

// ── TOML helpers (handle integer/float coercion) ──

fn toml_f32(v: &toml::Value, default: f32) -> f32 {
    v.as_float()
        .map(|f| f as f32)
        .or_else(|| v.as_integer().map(|i| i as f32))
        .unwrap_or(default)
}

fn toml_vec4(v: &toml::Value, default: [f32; 4]) -> [f32; 4] {
    if let Some(arr) = v.as_array() {
        if arr.len() >= 4 {
            return [
                toml_f32(&arr[0], default[0]),
                toml_f32(&arr[1], default[1]),
                toml_f32(&arr[2], default[2]),
                toml_f32(&arr[3], default[3]),
            ];
        }
    }
    default
}
