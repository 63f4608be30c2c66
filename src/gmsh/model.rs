use super::{BoundingBox, MeshControl, Rectangle, Side};
use crate::StrError;
use std::collections::HashSet;
use std::ffi::OsStr;
use std::fmt::{self, Write};
use std::fs::{self, File};
use std::io::Write as IoWrite;
use std::path::Path;

/// Defines the kind of a shape
#[derive(Clone, Debug, PartialEq)]
pub enum ShapeKind {
    /// A 2D region made of rectangles (given by their tags)
    Body(Vec<usize>),

    /// A 1D set of curves lying on sides of body shapes
    Boundary(Vec<(String, Side)>),
}

/// Holds a named set of entities that becomes a gmsh physical group
#[derive(Clone, Debug, PartialEq)]
pub struct Shape {
    /// Name of the shape and of the physical group
    pub name: String,

    /// Physical group id (shapes are numbered in creation order, starting at 1)
    pub physical_id: usize,

    /// Bodies or boundaries
    pub kind: ShapeKind,
}

impl Shape {
    /// Returns the space dimension of the entities (2 for bodies, 1 for boundaries)
    pub fn dim(&self) -> usize {
        match self.kind {
            ShapeKind::Body(..) => 2,
            ShapeKind::Boundary(..) => 1,
        }
    }
}

/// Holds a boolean difference between two rectangles
#[derive(Clone, Copy, Debug, PartialEq)]
struct Cut {
    object: usize,
    tool: usize,
    remove_tool: bool,
}

/// Holds a 2D gmsh model and writes it as a gmsh script (OpenCASCADE kernel)
///
/// Entities are never queried from gmsh: the script selects the surfaces and curves of
/// each shape with `In BoundingBox` after the boolean operations, so the tags gmsh
/// assigns while cutting and fragmenting do not matter.
pub struct Model {
    /// Name of the model
    pub name: String,

    /// Rectangles; tag = index + 1
    rectangles: Vec<Rectangle>,

    /// Boolean differences in the order they were requested
    cuts: Vec<Cut>,

    /// Fragments all surfaces so that touching bodies share their curves
    conformal: bool,

    /// Body and boundary shapes
    shapes: Vec<Shape>,

    /// Mesh-size directives
    controls: Vec<MeshControl>,

    /// Lets gmsh compute sizes from points, curvature, and boundaries
    characteristic_length: bool,
}

impl Model {
    /// Allocates a new (empty) model
    pub fn new(name: &str) -> Self {
        Model {
            name: name.to_string(),
            rectangles: Vec::new(),
            cuts: Vec::new(),
            conformal: false,
            shapes: Vec::new(),
            controls: Vec::new(),
            characteristic_length: true,
        }
    }

    /// Adds a rectangle and returns its tag
    pub fn add_rectangle(&mut self, rectangle: Rectangle) -> usize {
        self.rectangles.push(rectangle);
        self.rectangles.len()
    }

    /// Subtracts the `tool` rectangle from the `object` rectangle
    ///
    /// If `remove_tool` is false, the tool region remains as its own surface (and gets meshed);
    /// otherwise, the result is a hole.
    pub fn cut(&mut self, object: usize, tool: usize, remove_tool: bool) -> Result<&mut Self, StrError> {
        self.rectangle(object)?;
        self.rectangle(tool)?;
        if object == tool {
            return Err("cannot cut a rectangle with itself");
        }
        self.cuts.push(Cut {
            object,
            tool,
            remove_tool,
        });
        Ok(self)
    }

    /// Adds a body shape made of rectangles and returns its physical id
    pub fn add_shape(&mut self, name: &str, tags: &[usize]) -> Result<usize, StrError> {
        self.check_new_name(name)?;
        if tags.is_empty() {
            return Err("shape requires at least one rectangle");
        }
        for tag in tags {
            self.rectangle(*tag)?;
            if self.cuts.iter().any(|c| c.tool == *tag && c.remove_tool) {
                return Err("cannot add a removed rectangle to a shape");
            }
            let taken = self.shapes.iter().any(|s| match &s.kind {
                ShapeKind::Body(t) => t.contains(tag),
                _ => false,
            });
            if taken {
                return Err("rectangle already belongs to another shape");
            }
        }
        Ok(self.push_shape(name, ShapeKind::Body(tags.to_vec())))
    }

    /// Marks two body shapes as sharing an interface, i.e., they get conformal meshes
    ///
    /// The script fragments all surfaces at once; thus, after the first interface, every
    /// pair of touching bodies in the model shares its curves, not only the given pair.
    pub fn set_interface(&mut self, a: &str, b: &str) -> Result<&mut Self, StrError> {
        self.body_rectangles(a)?;
        self.body_rectangles(b)?;
        if a == b {
            return Err("cannot set an interface of a shape with itself");
        }
        self.conformal = true;
        Ok(self)
    }

    /// Adds a boundary shape made of sides of body shapes and returns its physical id
    ///
    /// A side refers to the bounding box of the whole body shape; e.g., the top side of a
    /// pipe wall made of two rectangles is the upper surface of the upper rectangle.
    pub fn add_boundary(&mut self, name: &str, parts: &[(&str, Side)]) -> Result<usize, StrError> {
        self.check_new_name(name)?;
        if parts.is_empty() {
            return Err("boundary requires at least one side");
        }
        for (shape, _) in parts {
            self.body_rectangles(shape)?;
        }
        let parts = parts.iter().map(|(s, side)| (s.to_string(), *side)).collect();
        Ok(self.push_shape(name, ShapeKind::Boundary(parts)))
    }

    /// Disables the mesh sizes computed from points, curvature, and boundaries
    ///
    /// The mesh controls then fully define the element sizes.
    pub fn deactivate_characteristic_length(&mut self) -> &mut Self {
        self.characteristic_length = false;
        self
    }

    /// Adds a mesh-size directive
    pub fn add_mesh_control(&mut self, control: MeshControl) -> Result<&mut Self, StrError> {
        control.validate()?;
        for name in control.shape_names() {
            self.shape(name)?;
        }
        if let MeshControl::Exponential { shape, .. } = &control {
            if self.shape(shape)?.dim() != 1 {
                return Err("exponential mesh control requires a boundary shape");
            }
        }
        self.controls.push(control);
        Ok(self)
    }

    /// Returns the shape with the given name
    pub fn shape(&self, name: &str) -> Result<&Shape, StrError> {
        self.shapes
            .iter()
            .find(|s| s.name == name)
            .ok_or("cannot find shape with the given name")
    }

    /// Returns the physical id of the shape with the given name
    pub fn physical_id(&self, name: &str) -> Result<usize, StrError> {
        Ok(self.shape(name)?.physical_id)
    }

    /// Returns all shapes in creation order
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// Returns the bounding box of all rectangles
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        BoundingBox::enclosing(&self.rectangles)
    }

    /// Returns the tolerance used to select entities by bounding box
    ///
    /// The tolerance is a thousandth of the smallest rectangle extent.
    pub fn tolerance(&self) -> f64 {
        let min_extent = self
            .rectangles
            .iter()
            .map(|r| f64::min(r.width, r.height))
            .fold(f64::INFINITY, f64::min);
        if min_extent.is_finite() {
            min_extent * 1e-3
        } else {
            1e-9
        }
    }

    /// Returns the gmsh script
    pub fn geo_script(&self) -> Result<String, StrError> {
        if self.shapes.is_empty() {
            return Err("there are no shapes to write");
        }
        let eps = self.tolerance();
        let mut buffer = String::new();

        // header
        write!(
            &mut buffer,
            "// model: {}\n\
             SetFactory(\"OpenCASCADE\");\n\
             General.Terminal = 1;\n\
             Mesh.MshFileVersion = 2.2;\n",
            self.name
        )
        .unwrap();

        // rectangles
        write!(&mut buffer, "\n// rectangles: x, y, z, width, height\n").unwrap();
        for (i, r) in self.rectangles.iter().enumerate() {
            write!(
                &mut buffer,
                "Rectangle({}) = {{{:?}, {:?}, 0, {:?}, {:?}}};\n",
                i + 1,
                r.x,
                r.y,
                r.width,
                r.height
            )
            .unwrap();
        }

        // boolean operations
        if !self.cuts.is_empty() || self.conformal {
            write!(&mut buffer, "\n// boolean operations\n").unwrap();
        }
        for cut in &self.cuts {
            let delete_tool = if cut.remove_tool { " Delete;" } else { "" };
            write!(
                &mut buffer,
                "BooleanDifference{{ Surface{{{}}}; Delete; }}{{ Surface{{{}}};{} }}\n",
                cut.object, cut.tool, delete_tool
            )
            .unwrap();
        }
        if self.conformal {
            write!(&mut buffer, "BooleanFragments{{ Surface{{:}}; Delete; }}{{ }}\n").unwrap();
        }

        // select the surfaces of each body
        write!(&mut buffer, "\n// bodies\n").unwrap();
        let bodies: Vec<_> = self
            .shapes
            .iter()
            .filter_map(|s| match &s.kind {
                ShapeKind::Body(tags) => Some((s.name.as_str(), tags)),
                _ => None,
            })
            .collect();
        for (name, tags) in &bodies {
            for (k, tag) in tags.iter().enumerate() {
                let op = if k == 0 { "=" } else { "+=" };
                let b = self.rectangles[*tag - 1].bounding_box().inflated(eps);
                write!(
                    &mut buffer,
                    "{}_all[] {} Surface In BoundingBox{{{}}};\n",
                    name,
                    op,
                    join(&b)
                )
                .unwrap();
            }
        }
        for (name, _) in &bodies {
            write!(&mut buffer, "{}[] = {}_all[];\n", name, name).unwrap();
            for inner in self.enclosed_bodies(name) {
                write!(&mut buffer, "{}[] -= {}_all[];\n", name, inner).unwrap();
            }
        }

        // select the curves of each boundary
        let boundaries: Vec<_> = self
            .shapes
            .iter()
            .filter_map(|s| match &s.kind {
                ShapeKind::Boundary(parts) => Some((s.name.as_str(), parts)),
                _ => None,
            })
            .collect();
        if !boundaries.is_empty() {
            write!(&mut buffer, "\n// boundaries\n").unwrap();
        }
        for (name, parts) in &boundaries {
            for (k, (shape, side)) in parts.iter().enumerate() {
                let op = if k == 0 { "=" } else { "+=" };
                let rects = self.body_rectangles(shape)?;
                let bbox = BoundingBox::enclosing(&rects).ok_or("cannot find the bounding box of a shape")?;
                let b = bbox.side(*side).inflated(eps);
                write!(
                    &mut buffer,
                    "{}[] {} Curve In BoundingBox{{{}}}; // {} {:?}\n",
                    name,
                    op,
                    join(&b),
                    shape,
                    side
                )
                .unwrap();
            }
        }

        // physical groups
        write!(&mut buffer, "\n// physical groups\n").unwrap();
        for shape in &self.shapes {
            let entity = if shape.dim() == 2 { "Surface" } else { "Curve" };
            write!(
                &mut buffer,
                "Physical {}(\"{}\", {}) = {{{}[]}};\n",
                entity, shape.name, shape.physical_id, shape.name
            )
            .unwrap();
        }

        // mesh sizes
        write!(&mut buffer, "\n// mesh sizes\n").unwrap();
        if !self.characteristic_length {
            write!(
                &mut buffer,
                "Mesh.MeshSizeFromPoints = 0;\n\
                 Mesh.MeshSizeFromCurvature = 0;\n\
                 Mesh.MeshSizeExtendFromBoundary = 0;\n"
            )
            .unwrap();
        }
        self.write_fields(&mut buffer)?;
        Ok(buffer)
    }

    /// Writes the gmsh script
    ///
    /// # Input
    ///
    /// * `full_path` -- may be a String, &str, or Path
    pub fn write_geo<P>(&self, full_path: &P) -> Result<(), StrError>
    where
        P: AsRef<OsStr> + ?Sized,
    {
        let buffer = self.geo_script()?;
        let path = Path::new(full_path).to_path_buf();
        if let Some(p) = path.parent() {
            fs::create_dir_all(p).map_err(|_| "cannot create directory")?;
        }
        let mut file = File::create(&path).map_err(|_| "cannot create file")?;
        file.write_all(buffer.as_bytes()).map_err(|_| "cannot write file")?;
        Ok(())
    }

    /// Writes one field per constant control, two per exponential control, and the Min background field
    fn write_fields(&self, buffer: &mut String) -> Result<(), StrError> {
        if self.controls.is_empty() {
            return Ok(());
        }
        let v_out = match self.bounding_box() {
            Some(b) => f64::max(b.max[0] - b.min[0], b.max[1] - b.min[1]),
            None => 1.0,
        };
        let mut field = 0;
        let mut combined = Vec::new();
        for control in &self.controls {
            match control {
                MeshControl::Constant { size, shapes } => {
                    field += 1;
                    let mut surfaces = Vec::new();
                    let mut curves = Vec::new();
                    for name in shapes {
                        let list = format!("{}[]", name);
                        if self.shape(name)?.dim() == 2 {
                            surfaces.push(list);
                        } else {
                            curves.push(list);
                        }
                    }
                    write!(
                        buffer,
                        "Field[{}] = Constant;\n\
                         Field[{}].VIn = {:?};\n\
                         Field[{}].VOut = {:?};\n",
                        field, field, size, field, v_out
                    )
                    .unwrap();
                    if !surfaces.is_empty() {
                        write!(buffer, "Field[{}].SurfacesList = {{{}}};\n", field, surfaces.join(", ")).unwrap();
                    }
                    if !curves.is_empty() {
                        write!(buffer, "Field[{}].CurvesList = {{{}}};\n", field, curves.join(", ")).unwrap();
                    }
                    combined.push(field);
                }
                MeshControl::Exponential {
                    shape,
                    size,
                    exponent,
                    factor,
                } => {
                    let distance = field + 1;
                    field += control.n_field();
                    write!(
                        buffer,
                        "Field[{}] = Distance;\n\
                         Field[{}].CurvesList = {{{}[]}};\n\
                         Field[{}].Sampling = 100;\n\
                         Field[{}] = MathEval;\n\
                         Field[{}].F = \"{:?} + {:?}*F{}^{:?}\";\n",
                        distance, distance, shape, distance, field, field, size, factor, distance, exponent
                    )
                    .unwrap();
                    combined.push(field);
                }
            }
        }
        let min = field + 1;
        let list: Vec<_> = combined.iter().map(|f| f.to_string()).collect();
        write!(
            buffer,
            "Field[{}] = Min;\n\
             Field[{}].FieldsList = {{{}}};\n\
             Background Field = {};\n",
            min,
            min,
            list.join(", "),
            min
        )
        .unwrap();
        Ok(())
    }

    /// Returns the names of the other bodies lying inside one of the rectangles of a body
    fn enclosed_bodies(&self, name: &str) -> Vec<&str> {
        let eps = self.tolerance();
        let outer: Vec<_> = match self.body_rectangles(name) {
            Ok(rects) => rects.iter().map(|r| r.bounding_box()).collect(),
            Err(_) => return Vec::new(),
        };
        self.shapes
            .iter()
            .filter(|s| s.name != name)
            .filter_map(|s| match &s.kind {
                ShapeKind::Body(tags) => {
                    let inside = tags.iter().all(|t| {
                        let b = self.rectangles[*t - 1].bounding_box();
                        outer.iter().any(|o| o.contains(&b, eps))
                    });
                    if inside {
                        Some(s.name.as_str())
                    } else {
                        None
                    }
                }
                _ => None,
            })
            .collect()
    }

    fn rectangle(&self, tag: usize) -> Result<&Rectangle, StrError> {
        if tag == 0 {
            return Err("cannot find rectangle with the given tag");
        }
        self.rectangles
            .get(tag - 1)
            .ok_or("cannot find rectangle with the given tag")
    }

    fn body_rectangles(&self, name: &str) -> Result<Vec<Rectangle>, StrError> {
        match &self.shape(name)?.kind {
            ShapeKind::Body(tags) => Ok(tags.iter().map(|t| self.rectangles[*t - 1]).collect()),
            ShapeKind::Boundary(..) => Err("shape must be a body"),
        }
    }

    fn check_new_name(&self, name: &str) -> Result<(), StrError> {
        let mut chars = name.chars();
        match chars.next() {
            Some(c) if c.is_ascii_alphabetic() => (),
            _ => return Err("shape name must start with a letter"),
        }
        if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err("shape name must contain only letters, digits, or underscores");
        }
        if self.shapes.iter().any(|s| s.name == name) {
            return Err("shape name already exists");
        }
        Ok(())
    }

    fn push_shape(&mut self, name: &str, kind: ShapeKind) -> usize {
        let physical_id = self.shapes.len() + 1;
        self.shapes.push(Shape {
            name: name.to_string(),
            physical_id,
            kind,
        });
        physical_id
    }
}

fn join(values: &[f64]) -> String {
    let all: Vec<_> = values.iter().map(|v| format!("{:?}", v)).collect();
    all.join(", ")
}

impl fmt::Display for Model {
    /// Prints a summary of the shapes and mesh controls
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Physical groups of {}\n", self.name).unwrap();
        write!(f, "=====================\n").unwrap();
        for shape in &self.shapes {
            write!(f, "{} : {} (dim = {})\n", shape.physical_id, shape.name, shape.dim()).unwrap();
        }
        write!(f, "\nMesh controls\n").unwrap();
        write!(f, "=============\n").unwrap();
        let unique: HashSet<_> = self.controls.iter().flat_map(|c| c.shape_names()).collect();
        for control in &self.controls {
            write!(f, "{}\n", control).unwrap();
        }
        write!(f, "({} shapes with mesh controls)\n", unique.len()).unwrap();
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
