use crate::knowledge::KnowledgeEntry;

/// Answer used when no entry matches.
pub const DEFAULT_RESPONSE: &str = "Thanks for your question! While I'd love to help with that \
specific inquiry, I recommend contacting our lighting experts directly for personalized \
assistance. You can call us at 0570514881 or visit our contact section for a detailed \
consultation. Our team can provide tailored LED lighting solutions for your specific needs \
in Saudi Arabia!";

/// First message of every chat session.
pub const GREETING: &str = "Hi! I'm your Ambienco Lighting Assistant! I'm here to help with all \
your LED lighting questions. Whether you need advice on the best lighting for your space, want \
to know about smart lighting options, or have questions about installation, I'm here to help! \
What can I assist you with today?";

/// Suggested opening questions shown above the chat input.
pub const QUICK_QUESTIONS: [&str; 6] = [
    "What are the benefits of LED lighting?",
    "Best LED solutions for Saudi climate?",
    "Smart lighting options available?",
    "How much can I save with LEDs?",
    "Installation services offered?",
    "Commercial lighting solutions?",
];

pub(crate) fn lighting_entries() -> Vec<KnowledgeEntry> {
    vec![
        KnowledgeEntry::new(
            ["led", "benefit", "advantage", "why", "better"],
            "LED Benefits",
            "LED lighting offers incredible benefits! They're 80% more energy efficient than \
             traditional bulbs, last 25+ years, produce less heat, and provide instant bright \
             light. Plus, they're eco-friendly and save you significant money on electricity \
             bills. Perfect for Saudi Arabia's climate!",
        )
        .with_follow_ups([
            "Tell me about LED strip lights",
            "What are the cost savings?",
            "Show me LED products",
        ]),
        KnowledgeEntry::new(
            ["strip", "strips", "flexible", "accent", "under cabinet"],
            "LED Strips",
            "LED strip lights are amazing for creating ambient lighting! They're perfect for \
             under-cabinet lighting, accent walls, cove lighting, and architectural features. \
             Our strips come in various colors, are dimmable, and can be cut to custom lengths. \
             Great for both residential and commercial spaces in Saudi Arabia.",
        )
        .with_follow_ups([
            "How to install LED strips?",
            "What colors are available?",
            "Indoor vs outdoor strips?",
        ]),
        KnowledgeEntry::new(
            ["smart", "automation", "control", "app", "wifi", "dimming"],
            "Smart Lighting",
            "Smart LED lighting is the future! Our smart solutions let you control lights via \
             smartphone apps, set schedules, adjust brightness, change colors, and integrate \
             with voice assistants. Perfect for modern Saudi homes: control your lighting \
             remotely and create the perfect ambiance for any occasion.",
        )
        .with_follow_ups([
            "Voice control options?",
            "Energy monitoring features?",
            "Installation requirements?",
        ]),
        KnowledgeEntry::new(
            ["commercial", "office", "business", "warehouse", "industrial"],
            "Commercial Lighting",
            "For commercial spaces, we offer high-performance LED solutions! Our \
             commercial-grade LEDs provide excellent light quality, reduce maintenance costs, \
             improve productivity, and meet international standards. Perfect for offices, \
             warehouses, retail spaces, and industrial facilities across Saudi Arabia.",
        )
        .with_follow_ups([
            "Warranty information?",
            "Bulk pricing available?",
            "Installation services?",
        ]),
        KnowledgeEntry::new(
            ["outdoor", "street", "security", "flood", "garden", "landscape"],
            "Outdoor Lighting",
            "Our outdoor LED lighting is built for Saudi Arabia's climate! Weather-resistant, \
             dust-proof (IP65+), and designed to withstand high temperatures. Perfect for street \
             lighting, security lights, garden illumination, and architectural highlighting. \
             Energy-efficient with excellent lifespan.",
        )
        .with_follow_ups([
            "Solar LED options?",
            "Motion sensor lights?",
            "Weather resistance details?",
        ]),
        KnowledgeEntry::new(
            ["cost", "price", "savings", "money", "budget", "cheap", "expensive"],
            "Cost & Savings",
            "LED lighting is a smart investment! While initial costs are higher, you'll save \
             60-80% on electricity bills. A typical LED bulb pays for itself in 6-12 months \
             through energy savings. Plus, with a 25+ year lifespan, you'll rarely need \
             replacements. We offer competitive pricing and bulk discounts!",
        )
        .with_follow_ups([
            "Calculate my savings",
            "Bulk pricing options",
            "Financing available?",
        ]),
        KnowledgeEntry::new(
            ["installation", "install", "setup", "wiring", "electrician"],
            "Installation",
            "Installation is easier than you think! Most LED bulbs are direct replacements for \
             traditional bulbs. For complex installations like strips or smart systems, our \
             certified technicians provide professional installation across Saudi Arabia. We \
             ensure safety, proper setup, and optimal performance.",
        )
        .with_follow_ups([
            "DIY installation guide",
            "Professional installation cost",
            "Warranty on installation",
        ]),
        KnowledgeEntry::new(
            ["color", "temperature", "warm", "cool", "rgb", "white"],
            "Color Temperature",
            "Choose the perfect light color! Warm white (2700K-3000K) for cozy spaces, cool \
             white (4000K-5000K) for offices and kitchens, daylight (5500K+) for task lighting. \
             RGB LEDs offer millions of colors for mood lighting. We'll help you select the \
             ideal color temperature for each space.",
        )
        .with_follow_ups([
            "Best colors for bedrooms?",
            "Office lighting recommendations",
            "RGB control options",
        ]),
        KnowledgeEntry::new(
            ["dimming", "dimmable", "brightness", "dim", "control"],
            "Dimming",
            "Dimmable LEDs offer perfect ambiance control! Our dimmable LEDs work with standard \
             dimmer switches and smart controls. Adjust brightness from 1-100%, save energy, and \
             create the perfect mood for any occasion. Great for living rooms, bedrooms, and \
             dining areas.",
        )
        .with_follow_ups([
            "Compatible dimmer switches",
            "Smart dimming options",
            "Smooth dimming technology",
        ]),
        KnowledgeEntry::new(
            ["warranty", "guarantee", "quality", "lifespan", "durability"],
            "Quality & Warranty",
            "Quality guaranteed! Our LED products come with 3-5 year warranties, with lifespans \
             of 25,000-50,000 hours. Built with premium components, rigorous testing, and \
             designed for Saudi Arabia's climate. If any issues arise, we provide fast \
             replacement and excellent customer support.",
        )
        .with_follow_ups([
            "Warranty claim process",
            "Product certifications",
            "Quality testing standards",
        ]),
        KnowledgeEntry::new(
            ["saudi", "arabia", "riyadh", "jeddah", "climate", "hot", "desert"],
            "Saudi Climate",
            "Designed for Saudi Arabia! Our LEDs are specifically tested for desert climates, \
             handling extreme heat, dust storms, and temperature fluctuations. With IP-rated \
             protection and heat-resistant materials, they perform reliably in Riyadh, Jeddah, \
             and across the Kingdom.",
        )
        .with_follow_ups([
            "Temperature range specifications",
            "Dust protection levels",
            "Local installation services",
        ]),
        KnowledgeEntry::new(
            ["energy", "efficiency", "consumption", "power", "electricity"],
            "Energy Efficiency",
            "Incredible energy efficiency! LEDs use 75-80% less energy than incandescent bulbs \
             and 50% less than CFLs. A 10W LED produces the same light as a 60W incandescent! \
             This means lower electricity bills and reduced environmental impact, perfect for \
             Saudi Arabia's sustainability goals.",
        )
        .with_follow_ups([
            "Energy calculator tool",
            "Environmental benefits",
            "Government incentives",
        ]),
    ]
}
