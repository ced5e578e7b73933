//! # Recipes
//!
//! An [`EditableModel`] is one generator call followed by an ordered list of
//! steps. Only the [`Recipe`] is persisted; the mesh is always a replay, so
//! identical recipes (seeds included) give bit-identical meshes.
//!
//! ## Example
//!
//! ```rust
//! use polyhydra::{EditableModel, GeneratorSpec, RecipeStep};
//! use polymesh::{ColorMethod, OpParams, Operator};
//!
//! let mut model = EditableModel::new(
//!     GeneratorSpec::Uniform { name: "cube".into() },
//!     ColorMethod::ByTags,
//! )
//! .unwrap();
//! model
//!     .apply_step(RecipeStep::Conway { operator: Operator::Kis, params: OpParams::default() })
//!     .unwrap();
//! assert_eq!(model.poly_mesh().face_count(), 24);
//!
//! let restored = EditableModel::from_json(&model.to_json().unwrap()).unwrap();
//! assert_eq!(restored.poly_mesh(), model.poly_mesh());
//! ```

use crate::error::{RecipeError, RecipeResult};
use crate::generators::{self, GeneratorSpec, GeneratorType};
use polymesh::config::KernelConfig;
use polymesh::{apply_with, export, ColorMethod, OpContext, OpParams, Operator, PolyMesh, PolyResult, RenderMesh};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One recorded modification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum RecipeStep {
    /// Apply a registry operator.
    Conway {
        /// Operator to run.
        operator: Operator,
        /// Its parameters; omitted fields use registry defaults.
        #[serde(default)]
        params: OpParams,
    },
    /// Replace every face's tags with one color tag.
    Color {
        /// Linear RGB in `[0, 1]`.
        rgb: [f32; 3],
    },
}

impl RecipeStep {
    fn run(&self, mesh: PolyMesh, ctx: &mut OpContext) -> PolyResult<PolyMesh> {
        match self {
            Self::Conway { operator, params } => apply_with(&mesh, *operator, params, ctx),
            Self::Color { rgb } => {
                let mut mesh = mesh;
                mesh.init_tags(*rgb);
                Ok(mesh)
            }
        }
    }
}

/// The persisted part of a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    /// Base mesh parameters.
    pub generator: GeneratorSpec,
    /// Coloring used by [`EditableModel::export`].
    #[serde(default)]
    pub color_method: ColorMethod,
    /// Steps in application order.
    #[serde(default)]
    pub operations: Vec<RecipeStep>,
}

impl Recipe {
    /// Builds the generator and runs every step in a fresh context.
    ///
    /// # Errors
    ///
    /// The first generator or operator error.
    pub fn replay(&self, config: KernelConfig) -> PolyResult<(PolyMesh, OpContext)> {
        let mut ctx = OpContext::new(config);
        let mut mesh = generators::build(&self.generator)?;
        for step in &self.operations {
            mesh = step.run(mesh, &mut ctx)?;
        }
        debug!(
            generator = %self.generator.generator_type(),
            steps = self.operations.len(),
            counts = %mesh.counts(),
            "replayed recipe"
        );
        Ok((mesh, ctx))
    }
}

/// A generator plus recorded steps, with the mesh they produce.
///
/// Serializes as its [`Recipe`]; deserializing replays it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "Recipe", into = "Recipe")]
pub struct EditableModel {
    recipe: Recipe,
    config: KernelConfig,
    poly_mesh: PolyMesh,
    context: OpContext,
}

impl EditableModel {
    /// Builds the base mesh with the default kernel config.
    ///
    /// # Errors
    ///
    /// Whatever the generator reports.
    pub fn new(generator: GeneratorSpec, color_method: ColorMethod) -> RecipeResult<Self> {
        Self::with_config(generator, color_method, KernelConfig::default())
    }

    /// Builds the base mesh with an explicit kernel config.
    ///
    /// # Errors
    ///
    /// Whatever the generator reports.
    pub fn with_config(
        generator: GeneratorSpec,
        color_method: ColorMethod,
        config: KernelConfig,
    ) -> RecipeResult<Self> {
        Self::from_recipe(
            Recipe {
                generator,
                color_method,
                operations: Vec::new(),
            },
            config,
        )
    }

    /// Replays `recipe`.
    ///
    /// # Errors
    ///
    /// The first generator or operator error.
    pub fn from_recipe(recipe: Recipe, config: KernelConfig) -> RecipeResult<Self> {
        let (poly_mesh, context) = recipe.replay(config)?;
        Ok(Self {
            recipe,
            config,
            poly_mesh,
            context,
        })
    }

    /// Current mesh.
    pub fn poly_mesh(&self) -> &PolyMesh {
        &self.poly_mesh
    }

    /// Persisted recipe.
    pub fn recipe(&self) -> &Recipe {
        &self.recipe
    }

    /// Generator parameters.
    pub fn generator(&self) -> &GeneratorSpec {
        &self.recipe.generator
    }

    /// Generator family.
    pub fn generator_type(&self) -> GeneratorType {
        self.recipe.generator.generator_type()
    }

    /// Recorded steps.
    pub fn operations(&self) -> &[RecipeStep] {
        &self.recipe.operations
    }

    /// Export coloring.
    pub fn color_method(&self) -> ColorMethod {
        self.recipe.color_method
    }

    /// Changes the export coloring; the mesh is untouched.
    pub fn set_color_method(&mut self, color_method: ColorMethod) {
        self.recipe.color_method = color_method;
    }

    /// Runs `step` on the current mesh and records it.
    ///
    /// A failing step leaves the model unchanged.
    ///
    /// # Errors
    ///
    /// The operator's error.
    pub fn apply_step(&mut self, step: RecipeStep) -> RecipeResult<()> {
        let mut ctx = self.context.clone();
        let mesh = step.run(self.poly_mesh.clone(), &mut ctx)?;
        self.poly_mesh = mesh;
        self.context = ctx;
        self.recipe.operations.push(step);
        Ok(())
    }

    /// Shorthand for a [`RecipeStep::Conway`] step.
    ///
    /// # Errors
    ///
    /// The operator's error.
    pub fn apply_operator(&mut self, operator: Operator, params: OpParams) -> RecipeResult<()> {
        self.apply_step(RecipeStep::Conway { operator, params })
    }

    /// Drops the last step and replays the rest.
    ///
    /// # Errors
    ///
    /// Replay errors; the model is unchanged in that case.
    pub fn remove_last_operation(&mut self) -> RecipeResult<Option<RecipeStep>> {
        let mut recipe = self.recipe.clone();
        let Some(removed) = recipe.operations.pop() else {
            return Ok(None);
        };
        let (poly_mesh, context) = recipe.replay(self.config)?;
        self.recipe = recipe;
        self.poly_mesh = poly_mesh;
        self.context = context;
        Ok(Some(removed))
    }

    /// Rebuilds the mesh from the recipe.
    ///
    /// # Errors
    ///
    /// The first generator or operator error.
    pub fn regenerate(&mut self) -> RecipeResult<()> {
        let (poly_mesh, context) = self.recipe.replay(self.config)?;
        self.poly_mesh = poly_mesh;
        self.context = context;
        Ok(())
    }

    /// Triangle buffers of the current mesh in the model's coloring.
    pub fn export(&self) -> RenderMesh {
        export(&self.poly_mesh, self.recipe.color_method)
    }

    /// Serializes the recipe.
    ///
    /// # Errors
    ///
    /// JSON encoding errors.
    pub fn to_json(&self) -> RecipeResult<String> {
        Ok(serde_json::to_string_pretty(&self.recipe)?)
    }

    /// Reads a recipe and replays it with the default kernel config.
    ///
    /// # Errors
    ///
    /// JSON decoding or replay errors.
    pub fn from_json(json: &str) -> RecipeResult<Self> {
        let recipe: Recipe = serde_json::from_str(json)?;
        recipe.try_into()
    }
}

impl TryFrom<Recipe> for EditableModel {
    type Error = RecipeError;

    fn try_from(recipe: Recipe) -> RecipeResult<Self> {
        Self::from_recipe(recipe, KernelConfig::default())
    }
}

impl From<EditableModel> for Recipe {
    fn from(model: EditableModel) -> Self {
        model.recipe
    }
}

#[cfg(test)]
mod tests;
