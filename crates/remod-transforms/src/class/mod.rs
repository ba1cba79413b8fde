//! The `class` transform.
//!
//! Rewrites the ES5 constructor/prototype idiom into a class declaration:
//!
//! ```javascript
//! function Dog(name) {
//!     Animal.call(this, name);
//! }
//! util.inherits(Dog, Animal);
//! Dog.prototype.bark = function() {
//!     Animal.prototype.speak.call(this, 'woof');
//! };
//! ```
//!
//! becomes
//!
//! ```javascript
//! class Dog extends Animal {
//!     constructor(name) {
//!         super(name);
//!     }
//!
//!     bark() {
//!         super.speak('woof');
//!     }
//! }
//! ```
//!
//! Every statement container is scanned on its own. Candidates are built
//! against an immutable view of the tree and only accepted ones are turned
//! into replacement instructions, so a rejected candidate never leaves a
//! partial edit behind.

pub mod builder;
pub mod candidate;
pub mod method_candidate;
pub mod super_calls;

pub use builder::{ClassCandidateBuilder, Scan};
pub use candidate::{ClassCandidate, ConstructorParts, MethodKey, Rejection};
pub use method_candidate::{CandidateKind, ClassId, FunctionParts, MethodCandidate, SuperClass};

use crate::contract::{Rewrite, Transform, TransformCtx, TransformError};
use remod_parser::NodeIndex;

#[derive(Debug, Default)]
pub struct ClassTransform {
    next_id: u32,
}

impl ClassTransform {
    pub fn new() -> Self {
        ClassTransform::default()
    }

    fn allocate_id(&mut self) -> ClassId {
        let id = ClassId(self.next_id);
        self.next_id += 1;
        id
    }
}

impl Transform for ClassTransform {
    fn name(&self) -> &'static str {
        "class"
    }

    fn visit(&mut self, ctx: &mut TransformCtx<'_>, node: NodeIndex) -> Result<Rewrite, TransformError> {
        let Some(list) = ctx.arena.statement_list(node) else {
            return Ok(Rewrite::Skip);
        };
        let statements = list.statements.clone();

        let mut candidates = Vec::new();
        let mut warnings = Vec::new();
        {
            let builder = ClassCandidateBuilder::new(ctx.arena, node, &statements);
            let mut index = 0;
            while index < statements.len() {
                let id = self.allocate_id();
                let scan = builder.scan_from(index, id);
                warnings.extend(scan.warnings);
                index = scan.resume_at;
                candidates.extend(scan.candidate);
            }
        }
        for (pos, message) in warnings {
            ctx.warn(pos, message);
        }
        if candidates.is_empty() {
            return Ok(Rewrite::Skip);
        }

        let instructions = candidates
            .into_iter()
            .map(|candidate| candidate.into_instruction(ctx.arena))
            .collect();
        Ok(Rewrite::ReplaceRange(instructions))
    }
}
