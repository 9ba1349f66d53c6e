//! Rule-based semantic classifier for nouns
//!
//! Categories are decided by exact membership in hand-curated word sets,
//! checked in a fixed priority order. People are never guessed from
//! suffixes, so "-er" words like "blender" only match their own sets.

use crate::encoder;
use crate::entry::CategoryTag;
use rustc_hash::FxHashSet;

/// Classifier tags in the order their sets are consulted
pub const PRIORITY: [CategoryTag; 7] = [
    CategoryTag::Animal,
    CategoryTag::FoodPlant,
    CategoryTag::Clothing,
    CategoryTag::Furniture,
    CategoryTag::VehicleMachine,
    CategoryTag::ObjectTool,
    CategoryTag::NaturalMaterial,
];

const ANIMALS: &[&str] = &[
    "alligator", "ant", "antelope", "ape", "bat", "bear", "beaver", "bee", "beetle", "bird",
    "bison", "buffalo", "bull", "butterfly", "camel", "cat", "caterpillar", "cheetah",
    "chicken", "chimpanzee", "cobra", "cow", "crab", "crane", "crocodile", "crow", "deer",
    "dog", "dolphin", "donkey", "dove", "dragonfly", "duck", "eagle", "eel", "elephant",
    "elk", "falcon", "ferret", "finch", "fish", "flamingo", "fly", "fox", "frog", "gecko",
    "giraffe", "goat", "goldfish", "goose", "gorilla", "grasshopper", "hamster", "hare",
    "hawk", "hedgehog", "hen", "heron", "hippo", "horse", "hummingbird", "hyena", "iguana",
    "jaguar", "jellyfish", "kangaroo", "kitten", "koala", "ladybug", "lamb", "leopard",
    "lion", "lizard", "llama", "lobster", "moose", "mosquito", "moth", "mouse", "mule",
    "octopus", "ostrich", "otter", "owl", "ox", "panda", "parrot", "peacock", "pelican",
    "penguin", "pig", "pigeon", "pony", "puppy", "rabbit", "raccoon", "rat", "raven",
    "rhino", "robin", "rooster", "salmon", "scorpion", "seal", "shark", "sheep", "shrimp",
    "skunk", "sloth", "snail", "snake", "spider", "squid", "squirrel", "starfish", "swan",
    "tiger", "toad", "trout", "tuna", "turkey", "turtle", "walrus", "wasp", "whale", "wolf",
    "worm", "yak", "zebra",
];

const FOOD_PLANTS: &[&str] = &[
    "apple", "apricot", "asparagus", "avocado", "bacon", "bagel", "banana", "bean", "beet",
    "biscuit", "bread", "broccoli", "brownie", "burger", "burrito", "butter", "cabbage",
    "cactus", "cake", "candy", "carrot", "cashew", "celery", "cereal", "cheese", "cherry",
    "chocolate", "coconut", "coffee", "cookie", "corn", "cracker", "cucumber", "cupcake",
    "daisy", "donut", "egg", "eggplant", "fern", "fig", "flower", "garlic", "grape",
    "grapefruit", "ham", "honey", "ice cream", "jam", "juice", "kiwi", "lemon", "lettuce",
    "lily", "lime", "mango", "melon", "milk", "muffin", "mushroom", "noodle", "oak", "olive",
    "onion", "orange", "orchid", "pancake", "pasta", "pea", "peach", "peanut", "pear",
    "pepper", "pickle", "pie", "pine", "pineapple", "pizza", "plum", "popcorn", "potato",
    "pretzel", "pumpkin", "radish", "raisin", "rice", "rose", "salad", "sandwich",
    "sausage", "soup", "spinach", "steak", "strawberry", "sugar", "sunflower", "taco",
    "tea", "tomato", "tree", "tulip", "turnip", "vanilla", "waffle", "walnut", "watermelon",
    "yogurt", "zucchini",
];

const CLOTHING: &[&str] = &[
    "apron", "belt", "beret", "bikini", "blazer", "blouse", "boot", "bra", "bracelet",
    "cap", "cardigan", "cloak", "coat", "dress", "earring", "glove", "gown", "hat",
    "helmet", "hoodie", "jacket", "jeans", "jersey", "kimono", "mitten", "necklace",
    "necktie", "pajamas", "pants", "parka", "poncho", "robe", "sandal", "scarf", "shirt",
    "shoe", "shorts", "skirt", "slipper", "sneaker", "sock", "suit", "sweater",
    "sweatshirt", "swimsuit", "t-shirt", "tie", "tights", "trousers", "turban", "tuxedo",
    "underwear", "uniform", "vest", "watch",
];

const FURNITURE: &[&str] = &[
    "armchair", "bed", "bench", "bookcase", "bookshelf", "bunk", "cabinet", "chair",
    "chest", "couch", "cradle", "crib", "cupboard", "desk", "dresser", "futon", "hammock",
    "mattress", "ottoman", "recliner", "shelf", "sideboard", "sofa", "stool", "table",
    "wardrobe",
];

const VEHICLES_MACHINES: &[&str] = &[
    "airplane", "ambulance", "bicycle", "bike", "blender", "boat", "bulldozer", "bus",
    "canoe", "car", "computer", "dishwasher", "dryer", "elevator", "engine", "ferry",
    "forklift", "freezer", "generator", "glider", "helicopter", "jeep", "jet", "kayak",
    "limousine", "microwave", "motorcycle", "oven", "plane", "printer", "raft", "refrigerator",
    "robot", "rocket", "sailboat", "scooter", "ship", "skateboard", "sled", "submarine",
    "subway", "tank", "taxi", "tractor", "train", "tram", "truck", "van", "washer",
    "wagon", "yacht",
];

const OBJECTS_TOOLS: &[&str] = &[
    "anchor", "axe", "backpack", "bag", "ball", "balloon", "basket", "battery", "bell",
    "blanket", "book", "bottle", "bowl", "box", "broom", "brush", "bucket", "button",
    "camera", "candle", "chisel", "clock", "comb", "compass", "crayon", "cup", "drill",
    "drum", "envelope", "eraser", "fan", "flashlight", "fork", "glass", "guitar", "hammer",
    "headphones", "key", "kite", "knife", "ladder", "lamp", "lock", "magnet", "map",
    "marker", "mirror", "mop", "mug", "nail", "needle", "notebook", "pan", "paper", "pen",
    "pencil", "phone", "piano", "pillow", "plate", "pliers", "pot", "purse", "radio",
    "rake", "ring", "rope", "ruler", "saw", "scissors", "screw", "screwdriver", "shovel",
    "soap", "spoon", "stapler", "sponge", "telescope", "toothbrush", "towel", "toy",
    "trumpet", "umbrella", "vase", "violin", "wallet", "whistle", "wrench",
];

const NATURAL_MATERIALS: &[&str] = &[
    "amber", "bamboo", "bone", "clay", "coal", "copper", "coral", "cotton", "crystal",
    "diamond", "dirt", "emerald", "feather", "flint", "gold", "granite", "gravel", "ice",
    "iron", "ivory", "leaf", "leather", "marble", "mud", "oil", "pearl", "pebble", "rock",
    "ruby", "salt", "sand", "shell", "silk", "silver", "slate", "snow", "stone", "straw",
    "timber", "tin", "water", "wax", "wood", "wool",
];

const PERSONS: &[&str] = &[
    "actor", "actress", "adult", "artist", "astronaut", "athlete", "aunt", "author",
    "baby", "baker", "banker", "barber", "bride", "brother", "butcher", "captain",
    "carpenter", "cashier", "chef", "child", "clown", "coach", "cousin", "cowboy",
    "dad", "dancer", "daughter", "dentist", "doctor", "driver", "engineer", "farmer",
    "father", "firefighter", "fisherman", "friend", "gardener", "girl", "boy", "grandma",
    "grandpa", "groom", "guard", "husband", "janitor", "judge", "king", "knight", "lawyer",
    "librarian", "lifeguard", "magician", "maid", "man", "mechanic", "mom", "monk",
    "mother", "musician", "neighbor", "nephew", "niece", "nun", "nurse", "painter",
    "pilot", "pirate", "plumber", "poet", "police", "policeman", "priest", "prince",
    "princess", "professor", "queen", "sailor", "scientist", "sheriff", "singer",
    "sister", "soldier", "son", "student", "surgeon", "tailor", "teacher", "teenager",
    "uncle", "waiter", "waitress", "wife", "witch", "wizard", "woman", "writer",
];

/// Membership sets consulted by the [`Classifier`]
#[derive(Debug, Clone, Default)]
pub struct ClassifierTables {
    pub animal: FxHashSet<String>,
    pub food_plant: FxHashSet<String>,
    pub clothing: FxHashSet<String>,
    pub furniture: FxHashSet<String>,
    pub vehicle_machine: FxHashSet<String>,
    pub object_tool: FxHashSet<String>,
    pub natural_material: FxHashSet<String>,
    pub person: FxHashSet<String>,
}

impl ClassifierTables {
    /// The curated tables shipped with the crate
    pub fn builtin() -> Self {
        fn set(words: &[&str]) -> FxHashSet<String> {
            words.iter().map(|w| w.to_string()).collect()
        }

        Self {
            animal: set(ANIMALS),
            food_plant: set(FOOD_PLANTS),
            clothing: set(CLOTHING),
            furniture: set(FURNITURE),
            vehicle_machine: set(VEHICLES_MACHINES),
            object_tool: set(OBJECTS_TOOLS),
            natural_material: set(NATURAL_MATERIALS),
            person: set(PERSONS),
        }
    }

    /// Set backing a classifier tag; `None` for tags without one
    pub fn set_for(&self, tag: CategoryTag) -> Option<&FxHashSet<String>> {
        match tag {
            CategoryTag::Animal => Some(&self.animal),
            CategoryTag::FoodPlant => Some(&self.food_plant),
            CategoryTag::Clothing => Some(&self.clothing),
            CategoryTag::Furniture => Some(&self.furniture),
            CategoryTag::VehicleMachine => Some(&self.vehicle_machine),
            CategoryTag::ObjectTool => Some(&self.object_tool),
            CategoryTag::NaturalMaterial => Some(&self.natural_material),
            CategoryTag::Person => Some(&self.person),
            _ => None,
        }
    }

    pub fn set_for_mut(&mut self, tag: CategoryTag) -> Option<&mut FxHashSet<String>> {
        match tag {
            CategoryTag::Animal => Some(&mut self.animal),
            CategoryTag::FoodPlant => Some(&mut self.food_plant),
            CategoryTag::Clothing => Some(&mut self.clothing),
            CategoryTag::Furniture => Some(&mut self.furniture),
            CategoryTag::VehicleMachine => Some(&mut self.vehicle_machine),
            CategoryTag::ObjectTool => Some(&mut self.object_tool),
            CategoryTag::NaturalMaterial => Some(&mut self.natural_material),
            CategoryTag::Person => Some(&mut self.person),
            _ => None,
        }
    }
}

/// Total, closed classifier: every word gets a tag
#[derive(Debug, Clone)]
pub struct Classifier {
    tables: ClassifierTables,
}

impl Classifier {
    pub fn new(tables: ClassifierTables) -> Self {
        Self { tables }
    }

    pub fn tables(&self) -> &ClassifierTables {
        &self.tables
    }

    /// Classify `word`, returning its tag and man-made flag.
    ///
    /// The surface form is tried first, then the form with separators
    /// removed ("ice cream" and "icecream" both hit).
    pub fn classify(&self, word: &str) -> (CategoryTag, bool) {
        let lower = word.trim().to_lowercase();
        let cleaned = encoder::clean(&lower);
        let hit = |set: &FxHashSet<String>| set.contains(&lower) || set.contains(&cleaned);

        for tag in PRIORITY {
            if self.tables.set_for(tag).is_some_and(hit) {
                return (tag, tag.is_manmade());
            }
        }
        if hit(&self.tables.person) {
            return (CategoryTag::Person, false);
        }
        (CategoryTag::Unknown, false)
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(ClassifierTables::builtin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_builtin() {
        let c = Classifier::default();
        assert_eq!(c.classify("apple"), (CategoryTag::FoodPlant, false));
        assert_eq!(c.classify("tiger"), (CategoryTag::Animal, false));
        assert_eq!(c.classify("hammer"), (CategoryTag::ObjectTool, true));
        assert_eq!(c.classify("sofa"), (CategoryTag::Furniture, true));
        assert_eq!(c.classify("Truck"), (CategoryTag::VehicleMachine, true));
        assert_eq!(c.classify("t-shirt"), (CategoryTag::Clothing, true));
        assert_eq!(c.classify("granite"), (CategoryTag::NaturalMaterial, false));
        assert_eq!(c.classify("teacher"), (CategoryTag::Person, false));
        assert_eq!(c.classify("happiness"), (CategoryTag::Unknown, false));
    }

    #[test]
    fn test_no_suffix_guessing() {
        let c = Classifier::default();
        // tool words ending in -er stay tools, unknown -er words stay unknown
        assert_eq!(c.classify("blender").0, CategoryTag::VehicleMachine);
        assert_eq!(c.classify("marker").0, CategoryTag::ObjectTool);
        assert_eq!(c.classify("flipper").0, CategoryTag::Unknown);
    }

    #[test]
    fn test_separator_forms() {
        let c = Classifier::default();
        assert_eq!(c.classify("ice cream").0, CategoryTag::FoodPlant);
        assert_eq!(c.classify("tshirt").0, CategoryTag::Unknown);
        assert_eq!(c.classify("t shirt").0, CategoryTag::Unknown);
    }

    #[test]
    fn test_priority_order() {
        let mut tables = ClassifierTables::default();
        tables.object_tool.insert("crane".to_string());
        tables.animal.insert("crane".to_string());
        tables.person.insert("crane".to_string());
        let c = Classifier::new(tables);
        assert_eq!(c.classify("crane"), (CategoryTag::Animal, false));
    }

    #[test]
    fn test_substitute_tables() {
        let mut tables = ClassifierTables::default();
        if let Some(set) = tables.set_for_mut(CategoryTag::Furniture) {
            set.insert("beanbag".to_string());
        }
        let c = Classifier::new(tables);
        assert_eq!(c.classify("beanbag"), (CategoryTag::Furniture, true));
        assert_eq!(c.classify("apple"), (CategoryTag::Unknown, false));
    }

    #[test]
    fn test_builtin_sets_are_lowercase() {
        let tables = ClassifierTables::builtin();
        for tag in PRIORITY.into_iter().chain([CategoryTag::Person]) {
            for word in tables.set_for(tag).unwrap() {
                assert_eq!(word, &word.to_lowercase(), "{word} in {tag}");
            }
        }
    }
}
