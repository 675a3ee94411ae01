//! Sphere list scene files.
//!
//! One sphere per line:
//!
//! ```text
//! # x    y    z    radius  kind        params...
//! 0.0    1.0  0.0  1.0     dielectric  1.5
//! -4.0   1.0  0.0  1.0     lambertian  0.4 0.2 0.1
//! 4.0    1.0  0.0  1.0     metal       0.7 0.6 0.5 0.0
//! ```
//!
//! Lines starting with `c` override camera settings instead:
//!
//! ```text
//! c ratio 16 9
//! c width 400
//! c samplesPerPixel 100
//! c maxDepth 50
//! c vfov 20
//! c lookFrom 13 2 3
//! c lookAt 0 0 0
//! c vup 0 1 0
//! c defocusAngle 0.6
//! c focusDist 10
//! ```
//!
//! Blank lines and lines starting with `#` are skipped. Every sphere gets its
//! own material entry.

use std::fs;
use std::io::Write;
use std::path::Path;

use glint_math::{Point3, Vec3};

use crate::config::CameraConfig;
use crate::scene::{MaterialDesc, SceneDesc, SceneError, SceneResult};

/// A parsed scene file: the spheres plus the camera settings in effect.
#[derive(Debug, Clone)]
pub struct SceneFile {
    pub scene: SceneDesc,
    pub camera: CameraConfig,
}

/// Load a scene file from disk, ignoring any camera lines.
pub fn load_scene(path: impl AsRef<Path>) -> SceneResult<SceneDesc> {
    Ok(load_scene_file(path, CameraConfig::default())?.scene)
}

/// Load a scene file from disk. Camera lines are applied on top of `camera`.
pub fn load_scene_file(path: impl AsRef<Path>, camera: CameraConfig) -> SceneResult<SceneFile> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let file = parse_scene_file(&content, camera)?;
    log::debug!(
        "Loaded {} spheres from {}",
        file.scene.sphere_count(),
        path.display()
    );
    Ok(file)
}

/// Parse scene file contents, ignoring any camera lines.
pub fn parse_scene(content: &str) -> SceneResult<SceneDesc> {
    Ok(parse_scene_file(content, CameraConfig::default())?.scene)
}

/// Parse scene file contents. Camera lines are applied on top of `camera`.
pub fn parse_scene_file(content: &str, camera: CameraConfig) -> SceneResult<SceneFile> {
    let mut file = SceneFile {
        scene: SceneDesc::new(),
        camera,
    };

    for (index, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let result = match line.strip_prefix("c ") {
            Some(setting) => parse_camera_line(&mut file.camera, setting),
            None => parse_line(&mut file.scene, line),
        };
        result.map_err(|err| at_line(err, index + 1))?;
    }

    Ok(file)
}

/// Write camera lines followed by the spheres, so that loading the output
/// reproduces both.
pub fn write_scene_file<W: Write>(file: &SceneFile, out: &mut W) -> SceneResult<()> {
    let camera = &file.camera;
    let vec = |v: Vec3| format!("{} {} {}", v.x, v.y, v.z);

    writeln!(out, "c ratio {} 1", camera.aspect_ratio)?;
    writeln!(out, "c width {}", camera.image_width)?;
    writeln!(out, "c samplesPerPixel {}", camera.samples_per_pixel)?;
    writeln!(out, "c maxDepth {}", camera.max_depth)?;
    writeln!(out, "c vfov {}", camera.vfov)?;
    writeln!(out, "c lookFrom {}", vec(camera.look_from))?;
    writeln!(out, "c lookAt {}", vec(camera.look_at))?;
    writeln!(out, "c vup {}", vec(camera.vup))?;
    writeln!(out, "c defocusAngle {}", camera.defocus_angle)?;
    writeln!(out, "c focusDist {}", camera.focus_dist)?;

    write_scene(&file.scene, out)
}

/// Write a scene in the format read by [`parse_scene`].
pub fn write_scene<W: Write>(scene: &SceneDesc, out: &mut W) -> SceneResult<()> {
    writeln!(out, "# x y z radius kind params...")?;
    for sphere in scene.spheres() {
        let material = scene
            .material(sphere.material)
            .ok_or(SceneError::UnknownMaterialId(sphere.material.index()))?;

        write!(
            out,
            "{} {} {} {} {}",
            sphere.center.x,
            sphere.center.y,
            sphere.center.z,
            sphere.radius,
            material.kind()
        )?;
        for param in material.params() {
            write!(out, " {param}")?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn parse_line(scene: &mut SceneDesc, line: &str) -> SceneResult<()> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 5 {
        return Err(parse_error(format!(
            "expected 'x y z radius kind params...', got {} fields",
            fields.len()
        )));
    }

    let x = parse_number(fields[0])?;
    let y = parse_number(fields[1])?;
    let z = parse_number(fields[2])?;
    let radius = parse_number(fields[3])?;
    let kind = fields[4];
    let params = fields[5..]
        .iter()
        .map(|field| parse_number(field))
        .collect::<SceneResult<Vec<f64>>>()?;

    let material = MaterialDesc::from_kind(kind, &params)?;
    scene.add_sphere_with_material(Point3::new(x, y, z), radius, material);
    Ok(())
}

fn parse_camera_line(camera: &mut CameraConfig, setting: &str) -> SceneResult<()> {
    let fields: Vec<&str> = setting.split_whitespace().collect();
    let Some((&name, values)) = fields.split_first() else {
        return Err(parse_error("camera line without a setting name".to_string()));
    };

    let expect_values = |count: usize| {
        if values.len() == count {
            Ok(())
        } else {
            Err(parse_error(format!(
                "camera setting '{name}' expects {count} values, got {}",
                values.len()
            )))
        }
    };
    let point = || -> SceneResult<Vec3> {
        expect_values(3)?;
        Ok(Vec3::new(
            parse_number(values[0])?,
            parse_number(values[1])?,
            parse_number(values[2])?,
        ))
    };
    let number = || -> SceneResult<f64> {
        expect_values(1)?;
        parse_number(values[0])
    };
    let count = || -> SceneResult<u32> {
        expect_values(1)?;
        parse_count(values[0])
    };

    match name {
        "ratio" => {
            expect_values(2)?;
            camera.aspect_ratio = parse_number(values[0])? / parse_number(values[1])?;
        }
        "width" => camera.image_width = count()?,
        "samplesPerPixel" => camera.samples_per_pixel = count()?,
        "maxDepth" => camera.max_depth = count()?,
        "vfov" => camera.vfov = number()?,
        "lookFrom" => camera.look_from = point()?,
        "lookAt" => camera.look_at = point()?,
        "vup" => camera.vup = point()?,
        "defocusAngle" => camera.defocus_angle = number()?,
        "focusDist" => camera.focus_dist = number()?,
        other => return Err(parse_error(format!("unknown camera setting '{other}'"))),
    }
    Ok(())
}

fn parse_count(field: &str) -> SceneResult<u32> {
    field
        .parse::<u32>()
        .map_err(|_| parse_error(format!("invalid count '{field}'")))
}

fn parse_number(field: &str) -> SceneResult<f64> {
    field
        .parse::<f64>()
        .map_err(|_| parse_error(format!("invalid number '{field}'")))
}

/// Parse error without a line number yet; `at_line` fills it in.
fn parse_error(message: String) -> SceneError {
    SceneError::Parse { line: 0, message }
}

fn at_line(err: SceneError, line: usize) -> SceneError {
    match err {
        SceneError::Parse { message, .. } => SceneError::Parse { line, message },
        SceneError::Io(err) => SceneError::Io(err),
        other => SceneError::Parse {
            line,
            message: other.to_string(),
        },
    }
}
