//! Static arXiv subject taxonomies (subarea code → display name).
//!
//! Hand-curated, not derived from data. A subarea seen in the input but
//! missing here is taxonomy drift and must be fixed by editing these tables.

/// One row of the Category table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    pub code: &'static str,
    pub name: &'static str,
}

/// Subareas of one top-level area, sorted by code
#[derive(Debug)]
pub struct Taxonomy {
    pub area: &'static str,
    pub categories: &'static [Category],
}

const fn c(code: &'static str, name: &'static str) -> Category {
    Category { code, name }
}

pub static MATH: Taxonomy = Taxonomy {
    area: "math",
    categories: &[
        c("AC", "Commutative Algebra"),
        c("AG", "Algebraic Geometry"),
        c("AP", "Analysis of PDEs"),
        c("AT", "Algebraic Topology"),
        c("CA", "Classical Analysis and ODEs"),
        c("CO", "Combinatorics"),
        c("CT", "Category Theory"),
        c("CV", "Complex Variables"),
        c("DG", "Differential Geometry"),
        c("DS", "Dynamical Systems"),
        c("FA", "Functional Analysis"),
        c("GM", "General Mathematics"),
        c("GN", "General Topology"),
        c("GR", "Group Theory"),
        c("GT", "Geometric Topology"),
        c("HO", "History and Overview"),
        c("IT", "Information Theory"),
        c("KT", "K-Theory and Homology"),
        c("LO", "Logic"),
        c("MG", "Metric Geometry"),
        c("MP", "Mathematical Physics"),
        c("NA", "Numerical Analysis"),
        c("NT", "Number Theory"),
        c("OA", "Operator Algebras"),
        c("OC", "Optimization and Control"),
        c("PR", "Probability"),
        c("QA", "Quantum Algebra"),
        c("RA", "Rings and Algebras"),
        c("RT", "Representation Theory"),
        c("SG", "Symplectic Geometry"),
        c("SP", "Spectral Theory"),
        c("ST", "Statistics Theory"),
    ],
};

pub static CS: Taxonomy = Taxonomy {
    area: "cs",
    categories: &[
        c("AI", "Artificial Intelligence"),
        c("AR", "Hardware Architecture"),
        c("CC", "Computational Complexity"),
        c("CE", "Computational Engineering, Finance, and Science"),
        c("CG", "Computational Geometry"),
        c("CL", "Computation and Language"),
        c("CR", "Cryptography and Security"),
        c("CV", "Computer Vision and Pattern Recognition"),
        c("CY", "Computers and Society"),
        c("DB", "Databases"),
        c("DC", "Distributed, Parallel, and Cluster Computing"),
        c("DL", "Digital Libraries"),
        c("DM", "Discrete Mathematics"),
        c("DS", "Data Structures and Algorithms"),
        c("ET", "Emerging Technologies"),
        c("FL", "Formal Languages and Automata Theory"),
        c("GL", "General Literature"),
        c("GR", "Graphics"),
        c("GT", "Computer Science and Game Theory"),
        c("HC", "Human-Computer Interaction"),
        c("IR", "Information Retrieval"),
        c("IT", "Information Theory"),
        c("LG", "Machine Learning"),
        c("LO", "Logic in Computer Science"),
        c("MA", "Multiagent Systems"),
        c("MM", "Multimedia"),
        c("MS", "Mathematical Software"),
        c("NA", "Numerical Analysis"),
        c("NE", "Neural and Evolutionary Computing"),
        c("NI", "Networking and Internet Architecture"),
        c("OH", "Other Computer Science"),
        c("OS", "Operating Systems"),
        c("PF", "Performance"),
        c("PL", "Programming Languages"),
        c("RO", "Robotics"),
        c("SC", "Symbolic Computation"),
        c("SD", "Sound"),
        c("SE", "Software Engineering"),
        c("SI", "Social and Information Networks"),
        c("SY", "Systems and Control"),
    ],
};

pub static STAT: Taxonomy = Taxonomy {
    area: "stat",
    categories: &[
        c("AP", "Applications"),
        c("CO", "Computation"),
        c("ME", "Methodology"),
        c("ML", "Machine Learning"),
        c("OT", "Other Statistics"),
        c("TH", "Statistics Theory"),
    ],
};

static ALL: [&Taxonomy; 3] = [&MATH, &CS, &STAT];

/// Taxonomy for a top-level area, if one is curated.
pub fn for_area(area: &str) -> Option<&'static Taxonomy> {
    ALL.iter().copied().find(|t| t.area == area)
}

/// Areas with a curated taxonomy.
pub fn areas() -> impl Iterator<Item = &'static str> {
    ALL.iter().map(|t| t.area)
}

impl Taxonomy {
    /// Look up a subarea code.
    pub fn get(&self, code: &str) -> Option<&'static Category> {
        self.categories
            .binary_search_by(|cat| cat.code.cmp(code))
            .ok()
            .map(|idx| &self.categories[idx])
    }

    pub fn contains(&self, code: &str) -> bool {
        self.get(code).is_some()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}
