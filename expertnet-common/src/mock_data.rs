use serde_json::json;

use crate::models::article::KnowledgeArticle;
use crate::models::consultant::{CaseStudy, ContactInfo, Consultant, Testimonial};
use crate::models::post::FeedPost;
use crate::models::timeline::{timeline_properties, Property, TimelinePost};
use crate::models::user::User;

struct Seed {
    id: u64,
    first_name: &'static str,
    last_name: &'static str,
    location: &'static str,
    company: &'static str,
    current_role: &'static str,
    functional_expertise: &'static [&'static str],
    geographical_expertise: &'static str,
    country_expertise: &'static str,
    rate: f64,
    bio: &'static str,
    education: &'static str,
    certifications: &'static [&'static str],
    languages: &'static [&'static str],
    phone: &'static str,
    availability: &'static str,
    testimonials: &'static [(&'static str, &'static str, &'static str)],
    case_studies: &'static [(&'static str, &'static str)],
}

const SEEDS: &[Seed] = &[
    Seed {
        id: 1,
        first_name: "John",
        last_name: "Smith",
        location: "New York, USA",
        company: "Smith & Associates",
        current_role: "Senior Real Estate Consultant",
        functional_expertise: &[
            "Commercial Real Estate",
            "Property Valuation",
            "Investment Analysis",
        ],
        geographical_expertise: "North America",
        country_expertise: "USA",
        rate: 250.0,
        bio: "John Smith is a seasoned real estate professional with over 15 years of experience \
              in commercial real estate and property valuation. He specializes in investment \
              analysis for institutional clients.",
        education: "MBA in Real Estate Finance, Columbia University",
        certifications: &[
            "Certified Commercial Investment Member (CCIM)",
            "Member of the Appraisal Institute (MAI)",
        ],
        languages: &["English", "Spanish"],
        phone: "+1 (212) 555-1234",
        availability: "Available for projects starting June 2025",
        testimonials: &[
            (
                "Sarah Johnson",
                "Global Investments Ltd",
                "John provided exceptional insights for our commercial property acquisition in \
                 Manhattan.",
            ),
            (
                "Michael Chen",
                "Pacific Development Group",
                "His deep knowledge of the New York market proved invaluable.",
            ),
        ],
        case_studies: &[
            (
                "Manhattan Office Complex Acquisition",
                "Advised on the $120M acquisition of a multi-tenant office complex, identifying \
                 value-add opportunities that increased ROI by 22%.",
            ),
            (
                "Brooklyn Mixed-Use Development",
                "Provided market analysis and financial modeling for a $85M mixed-use \
                 development project in Brooklyn.",
            ),
        ],
    },
    Seed {
        id: 2,
        first_name: "Emma",
        last_name: "Johnson",
        location: "London, UK",
        company: "Urban Development Partners",
        current_role: "Director of Residential Development",
        functional_expertise: &["Residential Development", "Urban Planning", "Sustainability"],
        geographical_expertise: "Europe",
        country_expertise: "UK",
        rate: 275.0,
        bio: "Emma Johnson is a residential development expert with a passion for sustainable \
              urban planning and 12 years of projects across the UK.",
        education: "Master's in Urban Planning, University College London",
        certifications: &[
            "Member of the Royal Town Planning Institute (MRTPI)",
            "LEED Accredited Professional",
        ],
        languages: &["English", "French"],
        phone: "+44 20 7946 0523",
        availability: "Limited availability - booking 3 months in advance",
        testimonials: &[(
            "David Williams",
            "Horizon Investments",
            "Emma's expertise in sustainable residential development transformed our project in \
             Manchester.",
        )],
        case_studies: &[(
            "Riverside Eco-Community, Bristol",
            "Led the planning of a 120-unit sustainable housing community that achieved carbon \
             neutrality.",
        )],
    },
    Seed {
        id: 3,
        first_name: "Carlos",
        last_name: "Rodriguez",
        location: "Madrid, Spain",
        company: "Global Hospitality Advisors",
        current_role: "Head of Hospitality Investments",
        functional_expertise: &[
            "Hospitality Real Estate",
            "Tourism Development",
            "Asset Management",
        ],
        geographical_expertise: "Europe",
        country_expertise: "Spain",
        rate: 225.0,
        bio: "Carlos Rodriguez is a hospitality real estate specialist who has advised on hotel \
              acquisitions and resort developments worth over EUR 300 million.",
        education: "MBA in Hospitality Management, IE Business School",
        certifications: &[
            "Certified Hotel Administrator (CHA)",
            "Real Estate Investment Advisor",
        ],
        languages: &["Spanish", "English", "Portuguese"],
        phone: "+34 91 123 4567",
        availability: "Available for consulting engagements",
        testimonials: &[(
            "Isabella Moreno",
            "Mediterranean Resorts Group",
            "Carlos provided exceptional guidance during our expansion into the Spanish coastal \
             market.",
        )],
        case_studies: &[(
            "Luxury Resort Development, Costa del Sol",
            "Managed the development strategy for a EUR 75M luxury resort.",
        )],
    },
    Seed {
        id: 4,
        first_name: "Aiko",
        last_name: "Tanaka",
        location: "Tokyo, Japan",
        company: "Kanto Property Research",
        current_role: "Principal, Office Markets",
        functional_expertise: &["Commercial Real Estate", "Market Research", "Office"],
        geographical_expertise: "Asia",
        country_expertise: "Japan",
        rate: 300.0,
        bio: "Aiko Tanaka covers Grade A office markets in Tokyo and Osaka for foreign \
              institutional investors.",
        education: "MSc in Real Estate, Waseda University",
        certifications: &["Licensed Real Estate Transaction Agent"],
        languages: &["Japanese", "English"],
        phone: "+81 3 1234 5678",
        availability: "Available for short advisory engagements",
        testimonials: &[],
        case_studies: &[(
            "Marunouchi Office Repositioning",
            "Built the leasing strategy for a 40,000 sqm office repositioning.",
        )],
    },
    Seed {
        id: 5,
        first_name: "Liam",
        last_name: "Walsh",
        location: "Sydney, Australia",
        company: "Harbour Capital Advisory",
        current_role: "Investment Director",
        functional_expertise: &["Investment Analysis", "Portfolio Management", "Industrial"],
        geographical_expertise: "Oceania",
        country_expertise: "Australia",
        rate: 240.0,
        bio: "Liam Walsh advises pension funds on logistics and industrial portfolios across the \
              eastern seaboard.",
        education: "Bachelor of Property Economics, University of Technology Sydney",
        certifications: &["Chartered Financial Analyst (CFA)"],
        languages: &["English"],
        phone: "+61 2 9876 5432",
        availability: "Available from Q3",
        testimonials: &[(
            "Grace Liu",
            "Southern Cross Super",
            "Liam's portfolio work was rigorous and clear.",
        )],
        case_studies: &[],
    },
];

fn handle(seed: &Seed) -> String {
    format!(
        "{}.{}",
        seed.first_name.to_lowercase(),
        seed.last_name.to_lowercase()
    )
}

fn document_id(seed: &Seed) -> String {
    format!("consultant-{}", handle(seed).replace('.', "-"))
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| String::from(*s)).collect()
}

pub fn mock_consultants() -> Vec<Consultant> {
    SEEDS
        .iter()
        .map(|seed| Consultant {
            document_id: document_id(seed),
            id: seed.id,
            user: None,
            first_name: String::from(seed.first_name),
            last_name: String::from(seed.last_name),
            location: String::from(seed.location),
            company: String::from(seed.company),
            current_role: String::from(seed.current_role),
            functional_expertise: to_strings(seed.functional_expertise),
            geographical_expertise: String::from(seed.geographical_expertise),
            country_expertise: String::from(seed.country_expertise),
            rate: seed.rate,
            bio: String::from(seed.bio),
            education: String::from(seed.education),
            certifications: to_strings(seed.certifications),
            languages: to_strings(seed.languages),
            profile_image: format!("/experts/{}.jpg", handle(seed).replace('.', "-")),
            contact_info: ContactInfo {
                email: Some(format!("{}@example.com", handle(seed))),
                phone: Some(String::from(seed.phone)),
                linkedin: Some(format!("linkedin.com/in/{}", handle(seed).replace('.', ""))),
            },
            availability: String::from(seed.availability),
            testimonials: seed
                .testimonials
                .iter()
                .zip(1..)
                .map(|((name, company, text), id)| Testimonial {
                    id,
                    name: String::from(*name),
                    company: String::from(*company),
                    text: String::from(*text),
                })
                .collect(),
            case_studies: seed
                .case_studies
                .iter()
                .zip(1..)
                .map(|((title, description), id)| CaseStudy {
                    id,
                    title: String::from(*title),
                    description: String::from(*description),
                })
                .collect(),
        })
        .collect()
}

/// Accounts for the first five mock consultants. Each user's ID matches its
/// consultant's ID.
pub fn mock_users() -> Vec<User> {
    mock_consultants()
        .into_iter()
        .take(5)
        .map(|c| {
            let username = format!("{}.{}", c.first_name.to_lowercase(), c.last_name.to_lowercase());
            let email = c
                .contact_info
                .email
                .clone()
                .unwrap_or_else(|| format!("{username}@example.com"));

            User {
                id: c.id,
                username,
                email,
                first_name: Some(c.first_name),
                last_name: Some(c.last_name),
                profile_image: Some(c.profile_image),
                company: Some(c.company),
                current_role: Some(c.current_role),
                location: Some(c.location),
                document_id: Some(c.document_id),
            }
        })
        .collect()
}

pub fn mock_timeline(document_id: &str) -> Vec<TimelinePost> {
    let harbour = Property {
        property_uid: String::from("prop-harbour-tower"),
        title: String::from("Harbour Tower"),
        address: String::from("1 Quay St"),
        property_type: String::from("Office"),
        status: String::from("Under Construction"),
        headline_metric: String::from("42,000 sqm NLA"),
        images: vec![String::from("/properties/harbour-tower.jpg")],
        roles: vec![String::from("Advisor")],
        deal_size: Some(120_000_000.0),
        irr: Some(14.5),
        completion_percentage: Some(60.0),
    };

    let posts = [
        (
            "consultant-john-smith",
            "post-1",
            "2025-05-01T10:00:00Z",
            "Closed diligence on **Harbour Tower**.",
            "ProgressUpdate",
            "Bull",
            Some(harbour),
        ),
        (
            "consultant-john-smith",
            "post-2",
            "2025-04-12T09:15:00Z",
            "Midtown sublease supply is finally shrinking.",
            "Insight",
            "Neutral",
            None,
        ),
        (
            "consultant-emma-johnson",
            "post-3",
            "2025-04-20T14:30:00Z",
            "Planning consent granted for the Riverside phase two.",
            "Milestone",
            "Bull",
            None,
        ),
    ];

    posts
        .into_iter()
        .filter(|post| post.0 == document_id)
        .map(|(author, post_id, created_at, body, post_type, sentiment, property)| {
            TimelinePost {
                post_id: String::from(post_id),
                person_id: String::from(author),
                created_at: String::from(created_at),
                body_md: String::from(body),
                media_urls: Vec::new(),
                property_uid: property.as_ref().map(|p| p.property_uid.clone()),
                post_type: String::from(post_type),
                sentiment: String::from(sentiment),
                visibility: String::from("Public"),
                reactions: vec![json!({ "reaction_type": "like", "count": 3 })],
                comments: Vec::new(),
                property_data: property,
            }
        })
        .collect()
}

struct FeedSeed {
    post_id: &'static str,
    author_id: u64,
    created_at: &'static str,
    post_type: &'static str,
    sentiment: &'static str,
    body: &'static str,
    location: &'static str,
    deal_size: &'static str,
    property_type: &'static str,
    engagement_score: f64,
    is_trending: bool,
    is_featured: bool,
    media: &'static [&'static str],
    comments: usize,
    tags: &'static [&'static str],
}

const FEED: &[FeedSeed] = &[
    FeedSeed {
        post_id: "feed-1",
        author_id: 1,
        created_at: "2025-06-08T15:20:00Z",
        post_type: "NewListing",
        sentiment: "Bull",
        body: "Bringing a **trophy office** floor to market in Midtown. Fully fitted, 10-year lease in place.",
        location: "Manhattan, New York",
        deal_size: "$50M+",
        property_type: "Office",
        engagement_score: 82.0,
        is_trending: true,
        is_featured: false,
        media: &["/feed/midtown-floor.jpg"],
        comments: 1,
        tags: &["Office", "New York"],
    },
    FeedSeed {
        post_id: "feed-2",
        author_id: 2,
        created_at: "2025-05-20T08:45:00Z",
        post_type: "Insight",
        sentiment: "Neutral",
        body: "BREEAM Outstanding is becoming table stakes for institutional buyers in London.",
        location: "London",
        deal_size: "Unknown",
        property_type: "Mixed Use",
        engagement_score: 35.0,
        is_trending: false,
        is_featured: true,
        media: &[],
        comments: 0,
        tags: &["Sustainability", "ESG"],
    },
    FeedSeed {
        post_id: "feed-3",
        author_id: 4,
        created_at: "2025-05-28T11:10:00Z",
        post_type: "ProgressUpdate",
        sentiment: "Bull",
        body: "Cladding complete on the last logistics unit. Practical completion next month.",
        location: "Rotterdam",
        deal_size: "$10M-$50M",
        property_type: "Industrial",
        engagement_score: 64.0,
        is_trending: false,
        is_featured: false,
        media: &["/feed/maasvlakte-1.jpg", "/feed/maasvlakte-2.jpg"],
        comments: 2,
        tags: &["Logistics"],
    },
    FeedSeed {
        post_id: "feed-4",
        author_id: 3,
        created_at: "2025-05-02T17:30:00Z",
        post_type: "Closing",
        sentiment: "Bear",
        body: "Closed a high-street retail parade at a 9% yield. Footfall is still below 2019.",
        location: "Madrid",
        deal_size: "$1M-$10M",
        property_type: "Retail",
        engagement_score: 18.0,
        is_trending: false,
        is_featured: false,
        media: &[],
        comments: 0,
        tags: &["Retail", "Spain"],
    },
    FeedSeed {
        post_id: "feed-5",
        author_id: 5,
        created_at: "2025-04-15T09:00:00Z",
        post_type: "Insight",
        sentiment: "Neutral",
        body: "Build-to-rent pipeline in Dublin has doubled since planning reform.",
        location: "Dublin",
        deal_size: "Unknown",
        property_type: "Residential",
        engagement_score: 51.0,
        is_trending: true,
        is_featured: true,
        media: &[],
        comments: 1,
        tags: &["Residential", "Ireland"],
    },
];

/// The global deal feed, newest first.
pub fn mock_feed() -> Vec<FeedPost> {
    let users = mock_users();

    FEED.iter()
        .map(|seed| {
            let author = users.iter().find(|u| u.id == seed.author_id);

            FeedPost {
                post_id: String::from(seed.post_id),
                person_id: seed.author_id.to_string(),
                author_name: author.map_or_else(|| String::from("Unknown User"), User::display_name),
                author_avatar: author.and_then(|u| u.profile_image.clone()),
                author_company: author
                    .and_then(|u| u.company.clone())
                    .unwrap_or_else(|| String::from("Unknown Company")),
                author_role: author
                    .and_then(|u| u.current_role.clone())
                    .unwrap_or_else(|| String::from("Real Estate Professional")),
                post_type: String::from(seed.post_type),
                body_md: String::from(seed.body),
                media_urls: to_strings(seed.media),
                property_uid: None,
                property_data: None,
                sentiment: String::from(seed.sentiment),
                visibility: String::from("Public"),
                reactions: vec![json!({ "reaction_type": "like", "count": seed.engagement_score as u64 / 10 })],
                comments: (1..=seed.comments)
                    .map(|i| json!({ "id": format!("{}-c{i}", seed.post_id), "body": "Interesting, thanks for sharing." }))
                    .collect(),
                created_at: String::from(seed.created_at),
                updated_at: String::from(seed.created_at),
                engagement_score: seed.engagement_score,
                deal_size: String::from(seed.deal_size),
                location: String::from(seed.location),
                property_type: String::from(seed.property_type),
                is_trending: seed.is_trending,
                is_featured: seed.is_featured,
                read_time: 1,
                tags: to_strings(seed.tags),
                view_count: seed.engagement_score as u64 * 12,
                share_count: seed.engagement_score as u64 / 8,
                save_count: seed.engagement_score as u64 / 5,
                deal_stage: String::from("Active"),
                roi_estimate: String::from("Unknown"),
                market_trend: String::from("Stable"),
            }
        })
        .collect()
}

struct ArticleSeed {
    title: &'static str,
    summary: &'static str,
    cover: &'static str,
    author: &'static str,
    published_at: &'static str,
    category: &'static str,
    tags: &'static [&'static str],
    view_count: u64,
    engagement_score: f64,
    read_time: u32,
    is_featured: bool,
    slug: &'static str,
    like_count: u64,
}

const ARTICLES: &[ArticleSeed] = &[
    ArticleSeed {
        title: "The Future of Urban Living: Trends in 2025",
        summary: "Explore how urban living spaces are evolving with technology integration and sustainability practices.",
        cover: "/knowledge/urban-living.jpg",
        author: "Emma Johnson",
        published_at: "2025-01-15T10:00:00Z",
        category: "Urban Planning",
        tags: &["Urban Planning", "Technology", "Sustainability", "Smart Cities"],
        view_count: 1247,
        engagement_score: 8.5,
        read_time: 8,
        is_featured: true,
        slug: "future-urban-living-trends-2025",
        like_count: 89,
    },
    ArticleSeed {
        title: "Commercial Real Estate Recovery Post-Pandemic",
        summary: "Analysis of how commercial properties are adapting to new work patterns and economic conditions.",
        cover: "/knowledge/commercial-recovery.jpg",
        author: "John Smith",
        published_at: "2025-01-10T14:30:00Z",
        category: "Commercial Real Estate",
        tags: &["Commercial", "Market Analysis", "Post-Pandemic", "Office"],
        view_count: 892,
        engagement_score: 7.2,
        read_time: 6,
        is_featured: false,
        slug: "commercial-real-estate-recovery-post-pandemic",
        like_count: 67,
    },
    ArticleSeed {
        title: "Sustainable Development in Emerging Markets",
        summary: "How green building practices are gaining momentum in rapidly developing urban centers worldwide.",
        cover: "/knowledge/sustainable-development.jpg",
        author: "Maria Sanchez",
        published_at: "2025-01-08T09:15:00Z",
        category: "Sustainability",
        tags: &["Sustainability", "Green Building", "Emerging Markets", "Development"],
        view_count: 567,
        engagement_score: 6.8,
        read_time: 7,
        is_featured: false,
        slug: "sustainable-development-emerging-markets",
        like_count: 45,
    },
    ArticleSeed {
        title: "Investment Opportunities in Global Real Estate",
        summary: "Strategic insights into promising real estate markets and sectors for investors in the coming year.",
        cover: "/knowledge/investment-opportunities.jpg",
        author: "Carlos Rodriguez",
        published_at: "2025-01-05T16:45:00Z",
        category: "Investment Analysis",
        tags: &["Investment", "Market Analysis", "Cap Rates", "IRR", "Global"],
        view_count: 1103,
        engagement_score: 8.1,
        read_time: 10,
        is_featured: true,
        slug: "investment-opportunities-global-real-estate",
        like_count: 123,
    },
    ArticleSeed {
        title: "PropTech Revolution: Technology Transforming Real Estate",
        summary: "From AI-powered property management to blockchain-based transactions, technology is reshaping the industry.",
        cover: "/knowledge/proptech.jpg",
        author: "Sarah Chen",
        published_at: "2025-01-03T11:20:00Z",
        category: "Technology",
        tags: &["Technology", "PropTech", "AI", "Blockchain", "Innovation"],
        view_count: 756,
        engagement_score: 7.9,
        read_time: 9,
        is_featured: false,
        slug: "proptech-revolution-technology-transforming-real-estate",
        like_count: 78,
    },
    ArticleSeed {
        title: "Residential Market Trends: What Buyers Want in 2025",
        summary: "Changing buyer preferences and how they are influencing residential development.",
        cover: "/knowledge/residential-trends.jpg",
        author: "Michael Brown",
        published_at: "2024-12-30T13:10:00Z",
        category: "Residential Real Estate",
        tags: &["Residential", "Market Trends", "Buyer Preferences", "Smart Homes"],
        view_count: 634,
        engagement_score: 6.5,
        read_time: 5,
        is_featured: false,
        slug: "residential-market-trends-buyer-preferences-2025",
        like_count: 34,
    },
];

/// The knowledge base, newest first. Article IDs are `"1"` to `"6"`.
pub fn mock_articles() -> Vec<KnowledgeArticle> {
    ARTICLES
        .iter()
        .zip(1..)
        .map(|(seed, id): (&ArticleSeed, u32)| KnowledgeArticle {
            id: id.to_string(),
            title: String::from(seed.title),
            summary: String::from(seed.summary),
            content: String::from("Full article content would go here..."),
            cover_image: Some(String::from(seed.cover)),
            author: String::from(seed.author),
            published_at: String::from(seed.published_at),
            category: String::from(seed.category),
            tags: to_strings(seed.tags),
            view_count: seed.view_count,
            engagement_score: seed.engagement_score,
            read_time: seed.read_time,
            is_featured: seed.is_featured,
            slug: String::from(seed.slug),
            like_count: seed.like_count,
        })
        .collect()
}

/// The properties a consultant has worked on, taken from their timeline.
pub fn mock_properties(document_id: &str) -> Vec<Property> {
    timeline_properties(mock_timeline(document_id))
}
