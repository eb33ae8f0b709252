// Model files: glTF 2.0 (.gltf/.glb) and Wavefront OBJ
//
// A model comes back as a flat list of parts. glTF node transforms are baked
// into the vertices, so every part is placed relative to the model origin.

use super::mesh::MeshData;
use super::{AssetError, AssetLoader, AssetType};
use crate::core::math::linear_to_srgb;
use glam::{Mat3, Mat4, Vec3};
use std::collections::HashSet;
use std::path::Path;

/// One drawable piece of a loaded model
#[derive(Debug, Clone)]
pub struct ModelPart {
    pub name: String,
    pub mesh: MeshData,
    /// sRGB color from the part's material, if it had one
    pub color: Option<Vec3>,
}

/// Load a model from `<root>/models/`, picking the parser by file extension
pub fn load_model(loader: &AssetLoader, file: &str) -> Result<Vec<ModelPart>, AssetError> {
    let path = loader.locate(AssetType::Model, file)?;
    match AssetType::Model.extension_of(file) {
        Some("obj") => load_obj(&path),
        _ => load_gltf(&path),
    }
}

/// Load a glTF 2.0 file, either JSON (`.gltf`) or binary (`.glb`)
pub fn load_gltf(path: &Path) -> Result<Vec<ModelPart>, AssetError> {
    if !path.exists() {
        return Err(AssetError::NotFound(path.to_string_lossy().to_string()));
    }

    let (document, buffers, _images) = gltf::import(path)
        .map_err(|e| AssetError::LoadError(format!("{}: {}", path.display(), e)))?;

    let roots: Vec<gltf::Node> = match document.default_scene().or_else(|| document.scenes().next()) {
        Some(scene) => scene.nodes().collect(),
        None => {
            let children: HashSet<usize> = document
                .nodes()
                .flat_map(|node| node.children().map(|child| child.index()))
                .collect();
            document
                .nodes()
                .filter(|node| !children.contains(&node.index()))
                .collect()
        }
    };

    let mut parts = Vec::new();
    for node in &roots {
        collect_node(node, Mat4::IDENTITY, &buffers, &mut parts);
    }

    if parts.is_empty() {
        return Err(AssetError::LoadError(format!(
            "{} contains no triangles",
            path.display()
        )));
    }

    Ok(parts)
}

fn collect_node(
    node: &gltf::Node,
    parent: Mat4,
    buffers: &[gltf::buffer::Data],
    parts: &mut Vec<ModelPart>,
) {
    let transform = parent * Mat4::from_cols_array_2d(&node.transform().matrix());

    if let Some(mesh) = node.mesh() {
        let mesh_name = mesh
            .name()
            .map(str::to_string)
            .unwrap_or_else(|| format!("mesh{}", mesh.index()));

        for primitive in mesh.primitives() {
            let name = format!("{}#{}", mesh_name, primitive.index());
            match read_primitive(&primitive, buffers, transform) {
                Some(mesh) => parts.push(ModelPart {
                    name,
                    mesh,
                    color: base_color(&primitive.material()),
                }),
                None => log::debug!("Skipping primitive '{}'", name),
            }
        }
    }

    for child in node.children() {
        collect_node(&child, transform, buffers, parts);
    }
}

fn read_primitive(
    primitive: &gltf::Primitive,
    buffers: &[gltf::buffer::Data],
    transform: Mat4,
) -> Option<MeshData> {
    if primitive.mode() != gltf::mesh::Mode::Triangles {
        return None;
    }

    let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|data| data.0.as_slice()));

    let positions: Vec<[f32; 3]> = reader
        .read_positions()?
        .map(|p| transform.transform_point3(Vec3::from(p)).to_array())
        .collect();

    let normal_matrix = Mat3::from_mat4(transform).inverse().transpose();
    let normals: Vec<[f32; 3]> = reader
        .read_normals()
        .map(|iter| {
            iter.map(|n| {
                (normal_matrix * Vec3::from(n))
                    .try_normalize()
                    .unwrap_or(Vec3::Y)
                    .to_array()
            })
            .collect()
        })
        .unwrap_or_default();

    let indices: Vec<u32> = match reader.read_indices() {
        Some(indices) => indices.into_u32().collect(),
        None => (0..positions.len() as u32).collect(),
    };

    let mut mesh = MeshData {
        positions,
        normals,
        indices,
    };
    if mesh.is_empty() {
        return None;
    }
    if mesh.normals.len() != mesh.positions.len() {
        mesh.compute_normals();
    }
    Some(mesh)
}

/// glTF base color factors are linear; parts carry sRGB like every other color
fn base_color(material: &gltf::Material) -> Option<Vec3> {
    material.index()?;
    let [r, g, b, _] = material.pbr_metallic_roughness().base_color_factor();
    Some(Vec3::new(linear_to_srgb(r), linear_to_srgb(g), linear_to_srgb(b)))
}

/// Load a Wavefront OBJ file (and its MTL materials, when present)
pub fn load_obj(path: &Path) -> Result<Vec<ModelPart>, AssetError> {
    if !path.exists() {
        return Err(AssetError::NotFound(path.to_string_lossy().to_string()));
    }

    let (models, materials) = tobj::load_obj(path, &tobj::GPU_LOAD_OPTIONS)
        .map_err(|e| AssetError::LoadError(format!("{}: {}", path.display(), e)))?;

    let materials = materials.unwrap_or_else(|e| {
        log::warn!("No materials for {}: {}", path.display(), e);
        Vec::new()
    });

    let mut parts = Vec::with_capacity(models.len());
    for model in models {
        let source = model.mesh;
        let mut mesh = MeshData {
            positions: source
                .positions
                .chunks_exact(3)
                .map(|p| [p[0], p[1], p[2]])
                .collect(),
            normals: source
                .normals
                .chunks_exact(3)
                .map(|n| [n[0], n[1], n[2]])
                .collect(),
            indices: source.indices,
        };

        if mesh.is_empty() {
            log::debug!("Skipping empty part '{}' in {}", model.name, path.display());
            continue;
        }
        if mesh.normals.len() != mesh.positions.len() {
            mesh.compute_normals();
        }

        let color = source
            .material_id
            .and_then(|id| materials.get(id))
            .and_then(|m| m.diffuse)
            .map(Vec3::from);

        parts.push(ModelPart {
            name: model.name,
            mesh,
            color,
        });
    }

    if parts.is_empty() {
        return Err(AssetError::LoadError(format!(
            "{} contains no triangles",
            path.display()
        )));
    }

    Ok(parts)
}
