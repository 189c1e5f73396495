//! Procedural unit meshes. Every shape is centred on the origin and sized to
//! fit a unit extent; instances scale them into place.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use std::f32::consts::{PI, TAU};

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex {
    fn new(p: Vec3, n: Vec3) -> Self {
        Self {
            position: p.to_array(),
            normal: n.normalize_or_zero().to_array(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    fn push_quad(&mut self, a: u32, b: u32, c: u32, d: u32) {
        self.indices.extend_from_slice(&[a, b, c, a, c, d]);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MeshKind {
    Cube,
    Cylinder,
    Sphere,
    Torus,
}

impl MeshKind {
    pub const ALL: [MeshKind; 4] = [
        MeshKind::Cube,
        MeshKind::Cylinder,
        MeshKind::Sphere,
        MeshKind::Torus,
    ];

    pub fn build(self, segments: u32) -> Mesh {
        match self {
            MeshKind::Cube => cuboid(),
            MeshKind::Cylinder => cylinder(segments),
            MeshKind::Sphere => uv_sphere(segments),
            MeshKind::Torus => torus(segments),
        }
    }
}

/// Unit cube (-0.5..0.5), flat-shaded.
pub fn cuboid() -> Mesh {
    let mut mesh = Mesh::default();
    let faces = [Vec3::X, -Vec3::X, Vec3::Y, -Vec3::Y, Vec3::Z, -Vec3::Z];
    for n in faces {
        // two axes spanning the face, ordered so the winding is CCW from outside
        let u = if n.y.abs() > 0.5 { Vec3::X } else { Vec3::Y };
        let v = n.cross(u);
        let base = mesh.vertices.len() as u32;
        for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            let p = (n + u * su + v * sv) * 0.5;
            mesh.vertices.push(Vertex::new(p, n));
        }
        mesh.push_quad(base, base + 1, base + 2, base + 3);
    }
    mesh
}

/// Radius 1, height 1, axis along y, with caps.
pub fn cylinder(segments: u32) -> Mesh {
    let segments = segments.max(3);
    let mut mesh = Mesh::default();
    for i in 0..=segments {
        let a = TAU * i as f32 / segments as f32;
        let (s, c) = a.sin_cos();
        let n = Vec3::new(s, 0.0, c);
        mesh.vertices.push(Vertex::new(Vec3::new(s, -0.5, c), n));
        mesh.vertices.push(Vertex::new(Vec3::new(s, 0.5, c), n));
    }
    for i in 0..segments {
        let b = i * 2;
        mesh.push_quad(b, b + 2, b + 3, b + 1);
    }
    for (y, n) in [(0.5, Vec3::Y), (-0.5, -Vec3::Y)] {
        let centre = mesh.vertices.len() as u32;
        mesh.vertices.push(Vertex::new(Vec3::new(0.0, y, 0.0), n));
        for i in 0..=segments {
            let a = TAU * i as f32 / segments as f32;
            let (s, c) = a.sin_cos();
            mesh.vertices.push(Vertex::new(Vec3::new(s, y, c), n));
        }
        for i in 0..segments {
            let a = centre + 1 + i;
            if y > 0.0 {
                mesh.indices.extend_from_slice(&[centre, a, a + 1]);
            } else {
                mesh.indices.extend_from_slice(&[centre, a + 1, a]);
            }
        }
    }
    mesh
}

/// Radius 1.
pub fn uv_sphere(segments: u32) -> Mesh {
    let sectors = segments.max(3);
    let stacks = (segments / 2).max(2);
    let mut mesh = Mesh::default();
    for j in 0..=stacks {
        let phi = PI * j as f32 / stacks as f32;
        let (sp, cp) = phi.sin_cos();
        for i in 0..=sectors {
            let theta = TAU * i as f32 / sectors as f32;
            let (st, ct) = theta.sin_cos();
            let p = Vec3::new(sp * st, cp, sp * ct);
            mesh.vertices.push(Vertex::new(p, p));
        }
    }
    let row = sectors + 1;
    for j in 0..stacks {
        for i in 0..sectors {
            let a = j * row + i;
            let b = a + row;
            mesh.push_quad(a, b, b + 1, a + 1);
        }
    }
    mesh
}

/// Major radius 1, tube radius 1/3, lying in the xz plane.
pub fn torus(segments: u32) -> Mesh {
    let tubular = segments.max(3);
    let radial = (segments / 2).max(3);
    let minor = 1.0 / 3.0;
    let mut mesh = Mesh::default();
    for j in 0..=radial {
        let v = TAU * j as f32 / radial as f32;
        let (sv, cv) = v.sin_cos();
        for i in 0..=tubular {
            let u = TAU * i as f32 / tubular as f32;
            let (su, cu) = u.sin_cos();
            let ring = Vec3::new(cu, 0.0, su);
            let p = ring * (1.0 + minor * cv) + Vec3::Y * (minor * sv);
            let n = ring * cv + Vec3::Y * sv;
            mesh.vertices.push(Vertex::new(p, n));
        }
    }
    let row = tubular + 1;
    for j in 0..radial {
        for i in 0..tubular {
            let a = j * row + i;
            let b = a + row;
            mesh.push_quad(a, a + 1, b + 1, b);
        }
    }
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_has_twelve_triangles() {
        assert_eq!(cuboid().triangle_count(), 12);
    }

    #[test]
    fn indices_stay_in_bounds() {
        for kind in MeshKind::ALL {
            let m = kind.build(10);
            let n = m.vertices.len() as u32;
            assert!(m.indices.iter().all(|&i| i < n), "{kind:?}");
        }
    }
}
